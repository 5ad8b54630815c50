//! Knowledge store port and the in-memory implementation.
//!
//! [`KnowledgeStore`] is the storage boundary the aggregation pipeline
//! talks to: entries, the user/expert directory, search history, and the
//! seeded documentation index. [`SqliteStore`](crate::sqlite_store) is the
//! persistent implementation; [`MemoryStore`] backs unit tests and scratch
//! runs.
//!
//! The ordering contracts live here as plain functions shared by both
//! implementations:
//!
//! - entries: `(helpful - not_helpful)` descending, then `created_at`
//!   descending (newest first);
//! - experts: term-match count descending, then solution rating
//!   descending, truncated to the caller's limit; zero-match users are
//!   never returned;
//! - history: newest first, capped.
//!
//! Mutations addressed to a missing id are silent no-ops, matching the
//! read-modify-write-by-id behavior the pipeline assumes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::models::{DocumentationLink, HistoryEntry, KnowledgeEntry, User};

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn save_entry(&self, entry: KnowledgeEntry) -> Result<()>;
    async fn entry_by_id(&self, id: &str) -> Result<Option<KnowledgeEntry>>;
    async fn all_entries(&self) -> Result<Vec<KnowledgeEntry>>;

    /// Substring match against title, problem, solution summary, or tags,
    /// ranked by the entry ordering contract.
    async fn search_entries(&self, query: &str) -> Result<Vec<KnowledgeEntry>>;

    async fn save_user(&self, user: User) -> Result<()>;
    async fn all_users(&self) -> Result<Vec<User>>;

    /// Users whose expertise tags match at least one term, ranked by the
    /// expert ordering contract and truncated to `limit`.
    async fn search_experts(&self, terms: &[String], limit: usize) -> Result<Vec<User>>;

    async fn increment_views(&self, id: &str) -> Result<()>;

    /// Record one rating event: exactly one of the two counters moves.
    async fn rate_entry(&self, id: &str, helpful: bool) -> Result<()>;

    async fn save_search_query(&self, query: &str) -> Result<()>;
    async fn search_history(&self) -> Result<Vec<HistoryEntry>>;

    async fn all_documentation(&self) -> Result<Vec<DocumentationLink>>;
    async fn save_documentation(&self, docs: Vec<DocumentationLink>) -> Result<()>;
}

pub(crate) fn entry_matches(entry: &KnowledgeEntry, lower_query: &str) -> bool {
    entry.title.to_lowercase().contains(lower_query)
        || entry.problem.to_lowercase().contains(lower_query)
        || entry.solution.summary.to_lowercase().contains(lower_query)
        || entry
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(lower_query))
}

pub(crate) fn rank_entries(entries: &mut [KnowledgeEntry]) {
    entries.sort_by(|a, b| {
        let score_a = a.metadata.helpful_count as i64 - a.metadata.not_helpful_count as i64;
        let score_b = b.metadata.helpful_count as i64 - b.metadata.not_helpful_count as i64;
        score_b
            .cmp(&score_a)
            .then_with(|| b.metadata.created_at.cmp(&a.metadata.created_at))
    });
}

pub(crate) fn expert_match_score(user: &User, terms: &[String]) -> usize {
    terms
        .iter()
        .filter(|term| {
            let lower_term = term.to_lowercase();
            user.expertise_tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&lower_term))
        })
        .count()
}

pub(crate) fn rank_experts(users: Vec<User>, terms: &[String], limit: usize) -> Vec<User> {
    let mut scored: Vec<(usize, User)> = users
        .into_iter()
        .map(|user| (expert_match_score(&user, terms), user))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(score_a, user_a), (score_b, user_b)| {
        score_b.cmp(score_a).then_with(|| {
            user_b
                .stats
                .solution_rating
                .total_cmp(&user_a.stats.solution_rating)
        })
    });

    scored.truncate(limit);
    scored.into_iter().map(|(_, user)| user).collect()
}

#[derive(Default)]
struct MemoryState {
    entries: Vec<KnowledgeEntry>,
    users: Vec<User>,
    history: Vec<HistoryEntry>,
    documentation: Vec<DocumentationLink>,
}

/// In-process [`KnowledgeStore`] holding everything in a mutex-guarded
/// state struct.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    history_limit: usize,
}

impl MemoryStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            history_limit,
        }
    }
}

#[async_trait]
impl KnowledgeStore for MemoryStore {
    async fn save_entry(&self, entry: KnowledgeEntry) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.entries.iter().position(|e| e.id == entry.id) {
            Some(i) => state.entries[i] = entry,
            None => state.entries.push(entry),
        }
        Ok(())
    }

    async fn entry_by_id(&self, id: &str) -> Result<Option<KnowledgeEntry>> {
        let state = self.state.lock().await;
        Ok(state.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn all_entries(&self) -> Result<Vec<KnowledgeEntry>> {
        Ok(self.state.lock().await.entries.clone())
    }

    async fn search_entries(&self, query: &str) -> Result<Vec<KnowledgeEntry>> {
        let lower = query.to_lowercase();
        let state = self.state.lock().await;
        let mut matches: Vec<KnowledgeEntry> = state
            .entries
            .iter()
            .filter(|entry| entry_matches(entry, &lower))
            .cloned()
            .collect();
        rank_entries(&mut matches);
        Ok(matches)
    }

    async fn save_user(&self, user: User) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.users.iter().position(|u| u.id == user.id) {
            Some(i) => state.users[i] = user,
            None => state.users.push(user),
        }
        Ok(())
    }

    async fn all_users(&self) -> Result<Vec<User>> {
        Ok(self.state.lock().await.users.clone())
    }

    async fn search_experts(&self, terms: &[String], limit: usize) -> Result<Vec<User>> {
        let users = self.state.lock().await.users.clone();
        Ok(rank_experts(users, terms, limit))
    }

    async fn increment_views(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) {
            entry.metadata.views += 1;
        }
        Ok(())
    }

    async fn rate_entry(&self, id: &str, helpful: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) {
            if helpful {
                entry.metadata.helpful_count += 1;
            } else {
                entry.metadata.not_helpful_count += 1;
            }
        }
        Ok(())
    }

    async fn save_search_query(&self, query: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.history.insert(
            0,
            HistoryEntry {
                query: query.to_string(),
                timestamp: Utc::now(),
            },
        );
        state.history.truncate(self.history_limit);
        Ok(())
    }

    async fn search_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.state.lock().await.history.clone())
    }

    async fn all_documentation(&self) -> Result<Vec<DocumentationLink>> {
        Ok(self.state.lock().await.documentation.clone())
    }

    async fn save_documentation(&self, docs: Vec<DocumentationLink>) -> Result<()> {
        self.state.lock().await.documentation = docs;
        Ok(())
    }
}
