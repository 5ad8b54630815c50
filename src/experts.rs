//! The `navify experts` command: query the expert index directly with
//! explicit terms, bypassing classification.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;
use crate::store::KnowledgeStore;

pub async fn run_experts(config: &Config, terms: &[String]) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone(), config.search.history_limit);

    let experts = store
        .search_experts(terms, config.search.expert_limit)
        .await?;

    if experts.is_empty() {
        println!("No experts matched.");
    } else {
        println!("{:<20} {:<24} {:<8} AVAILABILITY", "NAME", "ROLE", "RATING");
        for expert in &experts {
            println!(
                "{:<20} {:<24} {:<8.1} {:?}",
                expert.name, expert.role, expert.stats.solution_rating, expert.availability
            );
        }
    }

    pool.close().await;
    Ok(())
}
