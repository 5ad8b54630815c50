//! Core data models used throughout Navify.
//!
//! These types represent the knowledge entries, experts, and documentation
//! links that flow through the search aggregation pipeline, plus the tagged
//! [`SearchResult`] union the pipeline emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse query domain assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    Engineering,
    Hr,
    General,
}

/// Output of one classification pass over a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: QueryCategory,
    /// In `[0.5, 0.95]` for engineering/hr, exactly `0.5` for general.
    pub confidence: f64,
    /// Up to five matched keywords, in keyword-list order.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Busy,
    Away,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMethods {
    #[serde(default)]
    pub teams: Option<String>,
    #[serde(default)]
    pub slack: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub questions_asked: u32,
    pub questions_answered: u32,
    /// Average rating of this user's accepted solutions, 0.0–5.0.
    pub solution_rating: f64,
    /// Average response time in minutes.
    pub response_time: u32,
}

/// A directory user: an asker/solver on an entry, or an expert search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub expertise_tags: Vec<String>,
    pub contact_methods: ContactMethods,
    pub stats: UserStats,
    pub availability: Availability,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Outdated,
    Verified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub summary: String,
    pub steps: Vec<String>,
    #[serde(default)]
    pub code_snippets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReference {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub files: Vec<FileReference>,
    #[serde(default)]
    pub documentation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub created_at: DateTime<Utc>,
    pub resolved_at: DateTime<Utc>,
    /// Minutes from asked to resolved.
    pub resolution_time: u32,
    pub difficulty: Difficulty,
    pub views: u32,
    pub helpful_count: u32,
    pub not_helpful_count: u32,
    #[serde(default)]
    pub confluence_url: Option<String>,
}

/// A resolved problem/solution record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub problem: String,
    pub solution: Solution,
    pub asked_by: User,
    pub solved_by: Vec<User>,
    pub tags: Vec<String>,
    pub category: QueryCategory,
    pub resources: Resources,
    pub metadata: EntryMetadata,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSource {
    Confluence,
    Wiki,
    Github,
    Other,
}

/// A link into the documentation index. Read-only from the pipeline's
/// perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentationLink {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub tags: Vec<String>,
    pub source: DocSource,
}

/// One line of search history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload of a merged search result, discriminated by provenance kind.
///
/// Matching on this enum is how the render and merge branches stay
/// exhaustive: adding a fourth result kind is a compile error at every
/// consumer until handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ResultData {
    Solution(KnowledgeEntry),
    Expert(User),
    Documentation(DocumentationLink),
}

impl ResultData {
    pub fn kind(&self) -> &'static str {
        match self {
            ResultData::Solution(_) => "solution",
            ResultData::Expert(_) => "expert",
            ResultData::Documentation(_) => "documentation",
        }
    }
}

/// One entry of the merged result list produced per query.
///
/// `relevance_score` is provenance-derived display metadata (see the
/// aggregator's score table); it is never used as a sort key across
/// sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub relevance_score: f64,
    #[serde(flatten)]
    pub data: ResultData,
}

impl SearchResult {
    pub fn solution(score: f64, entry: KnowledgeEntry) -> Self {
        Self {
            relevance_score: score,
            data: ResultData::Solution(entry),
        }
    }

    pub fn expert(score: f64, user: User) -> Self {
        Self {
            relevance_score: score,
            data: ResultData::Expert(user),
        }
    }

    pub fn documentation(score: f64, doc: DocumentationLink) -> Self {
        Self {
            relevance_score: score,
            data: ResultData::Documentation(doc),
        }
    }

    pub fn is_solution(&self) -> bool {
        matches!(self.data, ResultData::Solution(_))
    }
}

impl QueryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Engineering => "engineering",
            QueryCategory::Hr => "hr",
            QueryCategory::General => "general",
        }
    }
}
