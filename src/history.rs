//! The `navify history` command.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;
use crate::store::KnowledgeStore;

pub async fn run_history(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone(), config.search.history_limit);

    let history = store.search_history().await?;
    if history.is_empty() {
        println!("No search history.");
    } else {
        for item in &history {
            println!("{}  {}", item.timestamp.format("%Y-%m-%d %H:%M"), item.query);
        }
    }

    pool.close().await;
    Ok(())
}
