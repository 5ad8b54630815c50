//! Entry detail commands: `navify get` and `navify rate`.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;
use crate::models::KnowledgeEntry;
use crate::sqlite_store::SqliteStore;
use crate::store::KnowledgeStore;

pub async fn run_get(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone(), config.search.history_limit);

    let entry = match store.entry_by_id(id).await? {
        Some(entry) => entry,
        None => {
            pool.close().await;
            bail!("entry not found: {}", id);
        }
    };

    // Opening a detail view counts as a view.
    store.increment_views(id).await?;
    print_entry(&entry);

    pool.close().await;
    Ok(())
}

pub async fn run_rate(config: &Config, id: &str, helpful: bool) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone(), config.search.history_limit);

    store.rate_entry(id, helpful).await?;

    match store.entry_by_id(id).await? {
        Some(entry) => println!(
            "Rated \"{}\": +{}/-{}",
            entry.title, entry.metadata.helpful_count, entry.metadata.not_helpful_count
        ),
        None => println!("No entry with id {}; nothing rated.", id),
    }

    pool.close().await;
    Ok(())
}

pub fn print_entry(entry: &KnowledgeEntry) {
    println!("{}", entry.title);
    println!(
        "[{} | {:?} | {:?} | {} views | +{}/-{}]",
        entry.category.as_str(),
        entry.metadata.difficulty,
        entry.status,
        entry.metadata.views,
        entry.metadata.helpful_count,
        entry.metadata.not_helpful_count
    );

    println!("\nProblem:\n  {}", entry.problem);
    println!("\nSolution:\n  {}", entry.solution.summary);

    if !entry.solution.steps.is_empty() {
        println!("\nSteps:");
        for (i, step) in entry.solution.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    if !entry.solution.code_snippets.is_empty() {
        println!("\nCode:");
        for snippet in &entry.solution.code_snippets {
            println!("  {}", snippet);
        }
    }

    if !entry.tags.is_empty() {
        println!("\nTags: {}", entry.tags.join(", "));
    }

    let solvers: Vec<&str> = entry.solved_by.iter().map(|u| u.name.as_str()).collect();
    println!(
        "\nAsked by {}; solved by {}",
        entry.asked_by.name,
        if solvers.is_empty() {
            "(no one recorded)".to_string()
        } else {
            solvers.join(", ")
        }
    );

    if !entry.resources.links.is_empty() {
        println!("\nLinks:");
        for link in &entry.resources.links {
            println!("  {}", link);
        }
    }
}
