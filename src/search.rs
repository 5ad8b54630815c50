//! The `navify search` command: wire up the store, QnA client, and
//! aggregator, then render whatever the pipeline decided - the merged
//! result list, or the detail view when a single solution auto-opens.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{Aggregator, SearchAction, SearchOutcome};
use crate::classifier::Classifier;
use crate::config::Config;
use crate::db;
use crate::entry::print_entry;
use crate::models::ResultData;
use crate::qna::HttpQnaClient;
use crate::sqlite_store::SqliteStore;

pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = Arc::new(SqliteStore::new(
        pool.clone(),
        config.search.history_limit,
    ));
    let qna = Arc::new(HttpQnaClient::new(&config.qna)?);
    let classifier = Classifier::new(&config.classifier);

    let aggregator = Aggregator::new(
        store,
        qna,
        classifier,
        config.search.expert_limit,
        Duration::from_secs(config.qna.timeout_secs),
    );

    match aggregator.run(query).await? {
        Some(outcome) => print_outcome(query, &outcome),
        None => println!("Nothing to search."),
    }

    pool.close().await;
    Ok(())
}

fn print_outcome(query: &str, outcome: &SearchOutcome) {
    println!(
        "Query classified as {} (confidence {:.2})",
        outcome.classification.category.as_str(),
        outcome.classification.confidence
    );

    if let Some(advisory) = &outcome.advisory {
        println!("\n{}", advisory);
    }

    match &outcome.action {
        SearchAction::OpenEntry(entry) => {
            println!("\nOne solution matched \"{}\" - opening it:\n", query);
            print_entry(entry);
        }
        SearchAction::ShowList => {
            if outcome.results.is_empty() {
                println!("\nNo results for \"{}\".", query);
                return;
            }

            println!("\n{} result(s) for \"{}\":\n", outcome.results.len(), query);
            for (i, result) in outcome.results.iter().enumerate() {
                let line = match &result.data {
                    ResultData::Solution(entry) => format!(
                        "{}  (id {}, {} views, +{}/-{})",
                        entry.title,
                        entry.id,
                        entry.metadata.views,
                        entry.metadata.helpful_count,
                        entry.metadata.not_helpful_count
                    ),
                    ResultData::Expert(user) => format!(
                        "{} - {}  ({})",
                        user.name,
                        user.role,
                        user.expertise_tags.join(", ")
                    ),
                    ResultData::Documentation(doc) => {
                        format!("{} - {}", doc.title, doc.url)
                    }
                };
                println!(
                    "{:>2}. [{:<13} {:.2}] {}",
                    i + 1,
                    result.data.kind(),
                    result.relevance_score,
                    line
                );
            }
        }
    }
}
