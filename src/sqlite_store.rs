//! SQLite-backed [`KnowledgeStore`].
//!
//! Each record lives as a JSON document in a `data` column keyed by id,
//! the persistent analog of the key-value store the original data lived
//! in. The data set is small (hundreds of entries, not millions), so
//! matching and ranking decode the rows and run the shared contract
//! functions from [`crate::store`] rather than pushing the subtle
//! tie-break rules into SQL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::{DocumentationLink, HistoryEntry, KnowledgeEntry, User};
use crate::store::{entry_matches, rank_entries, rank_experts, KnowledgeStore};

pub struct SqliteStore {
    pool: SqlitePool,
    history_limit: usize,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, history_limit: usize) -> Self {
        Self {
            pool,
            history_limit,
        }
    }

    async fn load_all<T: serde::de::DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let rows = sqlx::query(&format!("SELECT data FROM {}", table))
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let data: String = row.get("data");
            let record = serde_json::from_str(&data)
                .with_context(|| format!("Corrupt record in table {}", table))?;
            records.push(record);
        }
        Ok(records)
    }

    async fn upsert<T: serde::Serialize>(&self, table: &str, id: &str, record: &T) -> Result<()> {
        let data = serde_json::to_string(record)?;
        sqlx::query(&format!(
            "INSERT INTO {} (id, data) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET data = excluded.data",
            table
        ))
        .bind(id)
        .bind(data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_entry(&self, id: &str) -> Result<Option<KnowledgeEntry>> {
        let row = sqlx::query("SELECT data FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let data: String = row.get("data");
                let entry = serde_json::from_str(&data)
                    .with_context(|| format!("Corrupt entry record: {}", id))?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl KnowledgeStore for SqliteStore {
    async fn save_entry(&self, entry: KnowledgeEntry) -> Result<()> {
        let id = entry.id.clone();
        self.upsert("entries", &id, &entry).await
    }

    async fn entry_by_id(&self, id: &str) -> Result<Option<KnowledgeEntry>> {
        self.load_entry(id).await
    }

    async fn all_entries(&self) -> Result<Vec<KnowledgeEntry>> {
        self.load_all("entries").await
    }

    async fn search_entries(&self, query: &str) -> Result<Vec<KnowledgeEntry>> {
        let lower = query.to_lowercase();
        let mut matches: Vec<KnowledgeEntry> = self
            .load_all::<KnowledgeEntry>("entries")
            .await?
            .into_iter()
            .filter(|entry| entry_matches(entry, &lower))
            .collect();
        rank_entries(&mut matches);
        Ok(matches)
    }

    async fn save_user(&self, user: User) -> Result<()> {
        let id = user.id.clone();
        self.upsert("users", &id, &user).await
    }

    async fn all_users(&self) -> Result<Vec<User>> {
        self.load_all("users").await
    }

    async fn search_experts(&self, terms: &[String], limit: usize) -> Result<Vec<User>> {
        let users = self.load_all("users").await?;
        Ok(rank_experts(users, terms, limit))
    }

    async fn increment_views(&self, id: &str) -> Result<()> {
        if let Some(mut entry) = self.load_entry(id).await? {
            entry.metadata.views += 1;
            self.upsert("entries", id, &entry).await?;
        }
        Ok(())
    }

    async fn rate_entry(&self, id: &str, helpful: bool) -> Result<()> {
        if let Some(mut entry) = self.load_entry(id).await? {
            if helpful {
                entry.metadata.helpful_count += 1;
            } else {
                entry.metadata.not_helpful_count += 1;
            }
            self.upsert("entries", id, &entry).await?;
        }
        Ok(())
    }

    async fn save_search_query(&self, query: &str) -> Result<()> {
        sqlx::query("INSERT INTO search_history (query, timestamp) VALUES (?, ?)")
            .bind(query)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        // Evict beyond the cap, oldest first
        sqlx::query(
            "DELETE FROM search_history WHERE position NOT IN \
             (SELECT position FROM search_history ORDER BY position DESC LIMIT ?)",
        )
        .bind(self.history_limit as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn search_history(&self) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            "SELECT query, timestamp FROM search_history ORDER BY position DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut history = Vec::with_capacity(rows.len());
        for row in rows {
            let query: String = row.get("query");
            let timestamp: String = row.get("timestamp");
            let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .with_context(|| "Corrupt history timestamp")?
                .with_timezone(&Utc);
            history.push(HistoryEntry { query, timestamp });
        }
        Ok(history)
    }

    async fn all_documentation(&self) -> Result<Vec<DocumentationLink>> {
        self.load_all("documentation").await
    }

    async fn save_documentation(&self, docs: Vec<DocumentationLink>) -> Result<()> {
        for doc in &docs {
            self.upsert("documentation", &doc.id, doc).await?;
        }
        Ok(())
    }
}
