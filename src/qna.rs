//! QnA answer-service client and response mapping.
//!
//! The QnA service is asked whether a direct canned answer exists for a
//! query (`GET {base}/qna/ask?q=...`). Its reply discriminates on a
//! `found` boolean: a found reply carries the answer itself, a not-found
//! reply carries an advisory message plus suggested contacts and related
//! docs. The service is best-effort: unreachable hosts, timeouts, non-2xx
//! statuses, and malformed bodies all surface as `None`, never as an
//! error. The aggregation pipeline relies on that contract to degrade
//! gracefully.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::config::QnaConfig;
use crate::models::{
    Availability, ContactMethods, Difficulty, DocSource, DocumentationLink, EntryMetadata,
    EntryStatus, KnowledgeEntry, QueryCategory, Resources, Solution, User, UserStats,
};

/// Advisory shown when the service has no direct answer and its reply
/// carried no message of its own.
const DEFAULT_NOT_FOUND_MESSAGE: &str =
    "I don't have an exact answer, but here are some people who might help and related documentation:";

/// Raw reply body. Every field except `found` is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    found: bool,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    full_guide_link: Option<String>,
    #[serde(default)]
    suggested_contacts: Vec<WireContact>,
    #[serde(default)]
    related_docs: Vec<WireRelatedDoc>,
}

/// Suggested contact as the service sends it. The expertise list has gone
/// by three names across service versions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContact {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub expertise_tags: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRelatedDoc {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QnaFound {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub summary: Option<String>,
    pub full_guide_link: Option<String>,
    pub suggested_contacts: Vec<WireContact>,
    pub related_docs: Vec<WireRelatedDoc>,
}

#[derive(Debug, Clone)]
pub struct QnaNotFound {
    pub message: Option<String>,
    pub suggested_contacts: Vec<WireContact>,
    pub related_docs: Vec<WireRelatedDoc>,
}

impl QnaNotFound {
    /// Advisory text to show alongside the result list.
    pub fn advisory(&self) -> String {
        match &self.message {
            Some(message) if !message.trim().is_empty() => message.clone(),
            _ => DEFAULT_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum QnaResponse {
    Found(QnaFound),
    NotFound(QnaNotFound),
}

impl From<WireResponse> for QnaResponse {
    fn from(wire: WireResponse) -> Self {
        if wire.found {
            QnaResponse::Found(QnaFound {
                question: wire.question,
                answer: wire.answer,
                summary: wire.summary,
                full_guide_link: wire.full_guide_link,
                suggested_contacts: wire.suggested_contacts,
                related_docs: wire.related_docs,
            })
        } else {
            QnaResponse::NotFound(QnaNotFound {
                message: wire.message,
                suggested_contacts: wire.suggested_contacts,
                related_docs: wire.related_docs,
            })
        }
    }
}

/// Port for the QnA service. `None` means "no QnA contribution" for any
/// reason; implementations must not surface errors.
#[async_trait]
pub trait QnaClient: Send + Sync {
    async fn ask(&self, query: &str) -> Option<QnaResponse>;
}

/// HTTP client for the QnA service.
pub struct HttpQnaClient {
    client: reqwest::Client,
    base_url: String,
    enabled: bool,
}

impl HttpQnaClient {
    pub fn new(config: &QnaConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
        })
    }
}

#[async_trait]
impl QnaClient for HttpQnaClient {
    async fn ask(&self, query: &str) -> Option<QnaResponse> {
        if !self.enabled {
            return None;
        }

        let url = format!("{}/qna/ask", self.base_url);
        let response = match self.client.get(&url).query(&[("q", query)]).send().await {
            Ok(response) => response,
            Err(e) => {
                eprintln!("Warning: QnA service unreachable: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }

        match response.json::<WireResponse>().await {
            Ok(wire) => Some(wire.into()),
            Err(e) => {
                eprintln!("Warning: malformed QnA response: {}", e);
                None
            }
        }
    }
}

/// Map a suggested contact to a directory [`User`], filling the fields the
/// service does not provide with fixed defaults.
pub fn map_contact_to_user(contact: &WireContact) -> User {
    let email = contact.email.clone().unwrap_or_default();

    let mut expertise_tags = if !contact.expertise.is_empty() {
        contact.expertise.clone()
    } else if !contact.expertise_tags.is_empty() {
        contact.expertise_tags.clone()
    } else {
        contact.skills.clone()
    };
    expertise_tags.truncate(8);

    User {
        id: contact
            .id
            .clone()
            .unwrap_or_else(|| format!("contact-{}", Uuid::new_v4())),
        name: contact.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        email: email.clone(),
        role: contact.role.clone().unwrap_or_else(|| "N/A".to_string()),
        department: contact.department.clone().unwrap_or_default(),
        expertise_tags,
        contact_methods: ContactMethods {
            teams: None,
            slack: None,
            email,
        },
        stats: UserStats {
            questions_asked: 0,
            questions_answered: 0,
            solution_rating: 4.5,
            response_time: 60,
        },
        availability: Availability::Available,
        avatar: contact.profile_image.clone(),
    }
}

/// Map a related doc to a [`DocumentationLink`]. The source is always
/// Confluence, the only backend the service indexes.
pub fn map_related_doc(doc: &WireRelatedDoc) -> DocumentationLink {
    DocumentationLink {
        id: doc
            .uid
            .clone()
            .or_else(|| doc.name.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        title: doc
            .title
            .clone()
            .or_else(|| doc.name.clone())
            .unwrap_or_else(|| "Document".to_string()),
        url: doc
            .link
            .clone()
            .or_else(|| doc.url.clone())
            .unwrap_or_else(|| "#".to_string()),
        description: doc.description.clone().unwrap_or_default(),
        tags: doc.tags.clone(),
        source: DocSource::Confluence,
    }
}

/// Synthesize a [`KnowledgeEntry`] from a found answer so it renders like
/// any stored solution. The answer text becomes the step list (split on
/// newlines, blanks dropped); the first suggested contact stands in as the
/// asker.
pub fn map_found_to_entry(
    found: &QnaFound,
    category: QueryCategory,
    query: &str,
) -> KnowledgeEntry {
    let steps: Vec<String> = found
        .answer
        .as_deref()
        .unwrap_or_default()
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let summary = match &found.summary {
        Some(summary) if !summary.is_empty() => summary.clone(),
        _ => steps.first().cloned().unwrap_or_default(),
    };

    let contacts: Vec<User> = found.suggested_contacts.iter().map(map_contact_to_user).collect();
    let asked_by = contacts.first().cloned().unwrap_or_else(system_user);
    let solved_by: Vec<User> = contacts.into_iter().take(3).collect();

    let title = match &found.question {
        Some(question) if !question.is_empty() => question.clone(),
        _ => query.to_string(),
    };

    let now = Utc::now();
    KnowledgeEntry {
        id: format!("qna-{}", Uuid::new_v4()),
        title,
        problem: query.to_string(),
        solution: Solution {
            summary,
            steps,
            code_snippets: Vec::new(),
        },
        asked_by,
        solved_by,
        tags: Vec::new(),
        category,
        resources: Resources {
            links: found.full_guide_link.clone().into_iter().collect(),
            files: Vec::new(),
            documentation: found
                .related_docs
                .iter()
                .filter_map(|doc| doc.link.clone().or_else(|| doc.url.clone()))
                .collect(),
        },
        metadata: EntryMetadata {
            created_at: now,
            resolved_at: now,
            resolution_time: 0,
            difficulty: Difficulty::Easy,
            views: 0,
            helpful_count: 0,
            not_helpful_count: 0,
            confluence_url: found.full_guide_link.clone(),
        },
        status: EntryStatus::Active,
    }
}

fn system_user() -> User {
    User {
        id: "system".to_string(),
        name: "QnA".to_string(),
        email: String::new(),
        role: "system".to_string(),
        department: String::new(),
        expertise_tags: Vec::new(),
        contact_methods: ContactMethods {
            teams: None,
            slack: None,
            email: String::new(),
        },
        stats: UserStats {
            questions_asked: 0,
            questions_answered: 0,
            solution_rating: 0.0,
            response_time: 0,
        },
        availability: Availability::Available,
        avatar: None,
    }
}
