//! Search-result aggregation: the per-query orchestration core.
//!
//! One [`Aggregator::run`] call services one search submission:
//!
//! ```text
//!                ┌──────────────┐
//!   query ──────▶│  Classifier  │─ terms ─┐
//!                └──────────────┘         ▼
//!        ┌───────────┬───────────┬────────────┬───────────┐
//!        ▼           ▼           ▼            ▼           ▼
//!   history      QnA ask     entry        expert      doc index
//!   append      (timeout)    search       search       filter
//!        └───────────┴───────────┴────────────┴───────────┘
//!                            ▼
//!                 provenance-ordered merge
//!                            ▼
//!              show list  /  auto-open single solution
//! ```
//!
//! The merged list is ordered strictly by provenance, never re-sorted:
//! QnA direct answer, QnA suggested experts, QnA related docs, stored
//! solutions, stored experts, filtered documentation. Relevance scores are
//! fixed per bucket (1.0 / 0.85 / 0.80 / 0.90 / 0.80 / 0.70) and exist for
//! display only.
//!
//! The QnA service is the one fan-out leg with unbounded latency; it runs
//! under a deadline and any failure or timeout degrades to "no QnA
//! contribution". A generation counter guards against the stale-response
//! race: a search superseded by a newer submission discards its outcome
//! instead of clobbering the newer one's.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::classifier::Classifier;
use crate::models::{
    ClassificationResult, DocumentationLink, KnowledgeEntry, ResultData, SearchResult,
};
use crate::qna::{self, QnaClient, QnaResponse};
use crate::store::KnowledgeStore;

/// Relevance scores by provenance bucket.
const SCORE_QNA_SOLUTION: f64 = 1.0;
const SCORE_QNA_EXPERT: f64 = 0.85;
const SCORE_QNA_DOC: f64 = 0.80;
const SCORE_STORE_SOLUTION: f64 = 0.90;
const SCORE_STORE_EXPERT: f64 = 0.80;
const SCORE_INDEX_DOC: f64 = 0.70;

/// What the presentation layer should do with a finished search.
#[derive(Debug, Clone)]
pub enum SearchAction {
    /// Render the merged result list.
    ShowList,
    /// Exactly one solution came back: open its detail view directly.
    /// The entry's view counter has already been incremented.
    OpenEntry(KnowledgeEntry),
}

/// Everything one search submission produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub classification: ClassificationResult,
    pub results: Vec<SearchResult>,
    /// QnA "not found" advisory, shown separately from the result list.
    pub advisory: Option<String>,
    pub action: SearchAction,
}

pub struct Aggregator {
    store: Arc<dyn KnowledgeStore>,
    qna: Arc<dyn QnaClient>,
    classifier: Classifier,
    expert_limit: usize,
    qna_deadline: Duration,
    generation: AtomicU64,
}

impl Aggregator {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        qna: Arc<dyn QnaClient>,
        classifier: Classifier,
        expert_limit: usize,
        qna_deadline: Duration,
    ) -> Self {
        Self {
            store,
            qna,
            classifier,
            expert_limit,
            qna_deadline,
            generation: AtomicU64::new(0),
        }
    }

    /// Run the full pipeline for one query.
    ///
    /// Returns `Ok(None)` for blank queries (a no-op: nothing searched,
    /// nothing recorded) and for searches superseded by a newer submission
    /// while in flight. Store failures propagate; QnA failures never do.
    pub async fn run(&self, query: &str) -> Result<Option<SearchOutcome>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let classification = self.classifier.classify(query);
        let terms = self.classifier.extract_technical_terms(query);

        let (history_saved, qna_response, entries, experts, docs) = tokio::join!(
            self.store.save_search_query(query),
            timeout(self.qna_deadline, self.qna.ask(query)),
            self.store.search_entries(query),
            self.store.search_experts(&terms, self.expert_limit),
            self.store.all_documentation(),
        );

        // History is fire-and-forget: a failed append must not fail the
        // search.
        if let Err(e) = history_saved {
            eprintln!("Warning: failed to record search history: {}", e);
        }

        let qna_response = match qna_response {
            Ok(response) => response,
            Err(_) => {
                eprintln!("Warning: QnA service did not answer within the deadline");
                None
            }
        };

        let entries = entries?;
        let experts = experts?;
        let docs = docs?;

        let mut results = Vec::new();
        let mut advisory = None;

        match qna_response {
            Some(QnaResponse::Found(found)) => {
                let entry = qna::map_found_to_entry(&found, classification.category, query);
                results.push(SearchResult::solution(SCORE_QNA_SOLUTION, entry));
            }
            Some(QnaResponse::NotFound(not_found)) => {
                advisory = Some(not_found.advisory());
                for contact in &not_found.suggested_contacts {
                    results.push(SearchResult::expert(
                        SCORE_QNA_EXPERT,
                        qna::map_contact_to_user(contact),
                    ));
                }
                for doc in &not_found.related_docs {
                    results.push(SearchResult::documentation(
                        SCORE_QNA_DOC,
                        qna::map_related_doc(doc),
                    ));
                }
            }
            None => {}
        }

        for entry in entries {
            results.push(SearchResult::solution(SCORE_STORE_SOLUTION, entry));
        }
        for expert in experts {
            results.push(SearchResult::expert(SCORE_STORE_EXPERT, expert));
        }
        for doc in filter_documentation(docs, &terms) {
            results.push(SearchResult::documentation(SCORE_INDEX_DOC, doc));
        }

        // A newer search started while this one was in flight: drop the
        // stale outcome and skip its navigation side effect.
        if self.generation.load(Ordering::SeqCst) != ticket {
            return Ok(None);
        }

        let action = self.decide(&results).await?;

        Ok(Some(SearchOutcome {
            classification,
            results,
            advisory,
            action,
        }))
    }

    /// Auto-navigate when the merged list holds exactly one solution;
    /// otherwise show the list. Opening an entry counts as a view.
    async fn decide(&self, results: &[SearchResult]) -> Result<SearchAction> {
        let mut solutions = results.iter().filter_map(|result| match &result.data {
            ResultData::Solution(entry) => Some(entry),
            _ => None,
        });

        match (solutions.next(), solutions.next()) {
            (Some(single), None) => {
                self.store.increment_views(&single.id).await?;
                Ok(SearchAction::OpenEntry(single.clone()))
            }
            _ => Ok(SearchAction::ShowList),
        }
    }
}

/// A document qualifies when any of its tags contains any extracted term,
/// case-insensitively.
fn filter_documentation(
    docs: Vec<DocumentationLink>,
    terms: &[String],
) -> Vec<DocumentationLink> {
    docs.into_iter()
        .filter(|doc| {
            doc.tags.iter().any(|tag| {
                let lower_tag = tag.to_lowercase();
                terms.iter().any(|term| lower_tag.contains(&term.to_lowercase()))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::models::{
        Availability, ContactMethods, Difficulty, DocSource, EntryMetadata, EntryStatus,
        QueryCategory, Resources, ResultData, Solution, User, UserStats,
    };
    use crate::qna::{QnaFound, QnaNotFound, WireContact, WireRelatedDoc};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::{Notify, Semaphore};

    struct FakeQna(Option<QnaResponse>);

    #[async_trait]
    impl QnaClient for FakeQna {
        async fn ask(&self, _query: &str) -> Option<QnaResponse> {
            self.0.clone()
        }
    }

    struct SlowQna;

    #[async_trait]
    impl QnaClient for SlowQna {
        async fn ask(&self, _query: &str) -> Option<QnaResponse> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Some(QnaResponse::Found(found_response()))
        }
    }

    /// Blocks the first ask until released; later asks return nothing.
    struct BlockingQna {
        started: Notify,
        release: Semaphore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QnaClient for BlockingQna {
        async fn ask(&self, _query: &str) -> Option<QnaResponse> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.started.notify_one();
                let _permit = self.release.acquire().await.unwrap();
            }
            None
        }
    }

    fn found_response() -> QnaFound {
        QnaFound {
            question: Some("How do I clear the docker build cache?".to_string()),
            answer: Some("Run docker builder prune\nRetry the build".to_string()),
            summary: Some("Prune the builder cache".to_string()),
            full_guide_link: None,
            suggested_contacts: Vec::new(),
            related_docs: Vec::new(),
        }
    }

    fn not_found_response() -> QnaNotFound {
        QnaNotFound {
            message: Some("No direct answer on file.".to_string()),
            suggested_contacts: vec![
                WireContact {
                    name: Some("Priya".to_string()),
                    email: Some("priya@company.com".to_string()),
                    ..Default::default()
                },
                WireContact {
                    name: Some("Tom".to_string()),
                    ..Default::default()
                },
            ],
            related_docs: vec![WireRelatedDoc {
                title: Some("Build cache guide".to_string()),
                link: Some("https://confluence.company.com/build-cache".to_string()),
                ..Default::default()
            }],
        }
    }

    fn user(id: &str, tags: &[&str], rating: f64) -> User {
        User {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@company.com", id),
            role: "Engineer".to_string(),
            department: "Engineering".to_string(),
            expertise_tags: tags.iter().map(|t| t.to_string()).collect(),
            contact_methods: ContactMethods {
                teams: None,
                slack: None,
                email: format!("{}@company.com", id),
            },
            stats: UserStats {
                questions_asked: 0,
                questions_answered: 5,
                solution_rating: rating,
                response_time: 20,
            },
            availability: Availability::Available,
            avatar: None,
        }
    }

    fn entry(id: &str, title: &str) -> KnowledgeEntry {
        let now = Utc::now();
        KnowledgeEntry {
            id: id.to_string(),
            title: title.to_string(),
            problem: "problem".to_string(),
            solution: Solution {
                summary: "summary".to_string(),
                steps: vec!["step".to_string()],
                code_snippets: Vec::new(),
            },
            asked_by: user("asker", &[], 0.0),
            solved_by: Vec::new(),
            tags: Vec::new(),
            category: QueryCategory::Engineering,
            resources: Resources::default(),
            metadata: EntryMetadata {
                created_at: now,
                resolved_at: now,
                resolution_time: 5,
                difficulty: Difficulty::Easy,
                views: 0,
                helpful_count: 0,
                not_helpful_count: 0,
                confluence_url: None,
            },
            status: EntryStatus::Active,
        }
    }

    fn doc(id: &str, tags: &[&str]) -> DocumentationLink {
        DocumentationLink {
            id: id.to_string(),
            title: format!("Doc {}", id),
            url: format!("https://wiki.company.com/{}", id),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: DocSource::Wiki,
        }
    }

    fn aggregator(store: Arc<MemoryStore>, qna: Arc<dyn QnaClient>) -> Aggregator {
        Aggregator::new(
            store,
            qna,
            Classifier::new(&ClassifierConfig::default()),
            5,
            Duration::from_secs(5),
        )
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new(50));
        // Distinct helpfulness scores keep the ranking deterministic.
        let mut e1 = entry("e1", "Docker build cache misses");
        e1.metadata.helpful_count = 5;
        store.save_entry(e1).await.unwrap();
        let mut e2 = entry("e2", "Docker compose networking");
        e2.metadata.helpful_count = 1;
        store.save_entry(e2).await.unwrap();
        store.save_user(user("u1", &["Docker", "CI/CD"], 4.8)).await.unwrap();
        store
            .save_documentation(vec![
                doc("d1", &["Docker", "Builds"]),
                doc("d2", &["Payroll"]),
            ])
            .await
            .unwrap();
        store
    }

    fn kinds(outcome: &SearchOutcome) -> Vec<&'static str> {
        outcome.results.iter().map(|r| r.data.kind()).collect()
    }

    #[tokio::test]
    async fn test_blank_query_is_noop() {
        let store = Arc::new(MemoryStore::new(50));
        let agg = aggregator(store.clone(), Arc::new(FakeQna(None)));

        assert!(agg.run("   ").await.unwrap().is_none());
        assert!(store.search_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_order_with_not_found_qna() {
        let store = seeded_store().await;
        let agg = aggregator(
            store,
            Arc::new(FakeQna(Some(QnaResponse::NotFound(not_found_response())))),
        );

        let outcome = agg.run("docker").await.unwrap().unwrap();
        assert_eq!(
            kinds(&outcome),
            vec![
                "expert",        // QnA contact Priya
                "expert",        // QnA contact Tom
                "documentation", // QnA related doc
                "solution",      // e1
                "solution",      // e2
                "expert",        // u1
                "documentation", // d1
            ]
        );
        assert_eq!(outcome.advisory.as_deref(), Some("No direct answer on file."));

        let scores: Vec<f64> = outcome.results.iter().map(|r| r.relevance_score).collect();
        assert_eq!(scores, vec![0.85, 0.85, 0.80, 0.90, 0.90, 0.80, 0.70]);
        assert!(matches!(outcome.action, SearchAction::ShowList));
    }

    #[tokio::test]
    async fn test_found_qna_sorts_first_and_clears_advisory() {
        let store = seeded_store().await;
        let agg = aggregator(
            store,
            Arc::new(FakeQna(Some(QnaResponse::Found(found_response())))),
        );

        let outcome = agg.run("docker").await.unwrap().unwrap();
        assert_eq!(outcome.results[0].relevance_score, 1.0);
        assert!(outcome.results[0].is_solution());
        assert!(outcome.advisory.is_none());
        // Three solutions total (QnA + e1 + e2): no auto-navigate.
        assert!(matches!(outcome.action, SearchAction::ShowList));
    }

    #[tokio::test]
    async fn test_single_qna_solution_auto_navigates() {
        // No stored entries match, so the QnA answer is the only solution.
        let store = Arc::new(MemoryStore::new(50));
        store.save_user(user("u1", &["TLS"], 4.2)).await.unwrap();
        let agg = aggregator(
            store,
            Arc::new(FakeQna(Some(QnaResponse::Found(found_response())))),
        );

        let outcome = agg.run("certificate rotation").await.unwrap().unwrap();
        match &outcome.action {
            SearchAction::OpenEntry(opened) => {
                assert!(opened.id.starts_with("qna-"));
            }
            SearchAction::ShowList => panic!("expected auto-navigate"),
        }
    }

    #[tokio::test]
    async fn test_single_store_solution_auto_navigates_and_counts_view() {
        let store = Arc::new(MemoryStore::new(50));
        store
            .save_entry(entry("e1", "Docker build cache misses"))
            .await
            .unwrap();
        let agg = aggregator(store.clone(), Arc::new(FakeQna(None)));

        let outcome = agg.run("cache misses").await.unwrap().unwrap();
        match &outcome.action {
            SearchAction::OpenEntry(opened) => assert_eq!(opened.id, "e1"),
            SearchAction::ShowList => panic!("expected auto-navigate"),
        }

        let stored = store.entry_by_id("e1").await.unwrap().unwrap();
        assert_eq!(stored.metadata.views, 1);
    }

    #[tokio::test]
    async fn test_multiple_solutions_show_list_without_view_count() {
        let store = seeded_store().await;
        let agg = aggregator(store.clone(), Arc::new(FakeQna(None)));

        let outcome = agg.run("docker").await.unwrap().unwrap();
        assert!(matches!(outcome.action, SearchAction::ShowList));

        for id in ["e1", "e2"] {
            let stored = store.entry_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.metadata.views, 0);
        }
    }

    #[tokio::test]
    async fn test_zero_solutions_show_list() {
        let store = Arc::new(MemoryStore::new(50));
        store.save_user(user("u1", &["Docker"], 4.0)).await.unwrap();
        let agg = aggregator(store, Arc::new(FakeQna(None)));

        let outcome = agg.run("docker networking").await.unwrap().unwrap();
        assert!(matches!(outcome.action, SearchAction::ShowList));
        assert!(outcome.results.iter().all(|r| !r.is_solution()));
    }

    #[tokio::test]
    async fn test_absent_qna_leaves_no_trace() {
        let store = seeded_store().await;
        let agg = aggregator(store, Arc::new(FakeQna(None)));

        let outcome = agg.run("docker").await.unwrap().unwrap();
        assert!(outcome.advisory.is_none());
        assert_eq!(
            kinds(&outcome),
            vec!["solution", "solution", "expert", "documentation"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_qna_timeout_degrades_to_absent() {
        let store = seeded_store().await;
        let with_slow = aggregator(store.clone(), Arc::new(SlowQna));
        let with_none = aggregator(store, Arc::new(FakeQna(None)));

        let slow = with_slow.run("docker").await.unwrap().unwrap();
        let none = with_none.run("docker").await.unwrap().unwrap();

        assert_eq!(kinds(&slow), kinds(&none));
        assert_eq!(slow.advisory, none.advisory);
    }

    #[tokio::test]
    async fn test_history_recorded_per_search() {
        let store = seeded_store().await;
        let agg = aggregator(store.clone(), Arc::new(FakeQna(None)));

        agg.run("docker").await.unwrap();
        agg.run("kubernetes").await.unwrap();

        let history = store.search_history().await.unwrap();
        assert_eq!(history[0].query, "kubernetes");
        assert_eq!(history[1].query, "docker");
    }

    #[tokio::test]
    async fn test_doc_filter_is_case_insensitive_substring() {
        let store = Arc::new(MemoryStore::new(50));
        store
            .save_documentation(vec![
                doc("match", &["Kubernetes-Operations"]),
                doc("miss", &["Payroll"]),
            ])
            .await
            .unwrap();
        let agg = aggregator(store, Arc::new(FakeQna(None)));

        let outcome = agg.run("kubernetes upgrade").await.unwrap().unwrap();
        let doc_ids: Vec<&str> = outcome
            .results
            .iter()
            .filter_map(|r| match &r.data {
                ResultData::Documentation(d) => Some(d.id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(doc_ids, vec!["match"]);
    }

    #[tokio::test]
    async fn test_superseded_search_is_discarded() {
        let store = Arc::new(MemoryStore::new(50));
        store
            .save_entry(entry("e1", "Docker build cache misses"))
            .await
            .unwrap();

        let qna = Arc::new(BlockingQna {
            started: Notify::new(),
            release: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        });
        let agg = Arc::new(aggregator(store.clone(), qna.clone()));

        let stale = {
            let agg = agg.clone();
            tokio::spawn(async move { agg.run("cache misses").await })
        };
        qna.started.notified().await;

        // A newer search runs to completion while the first is blocked.
        let fresh = agg.run("cache misses").await.unwrap().unwrap();
        assert!(matches!(fresh.action, SearchAction::OpenEntry(_)));

        qna.release.add_permits(1);
        let stale = stale.await.unwrap().unwrap();
        assert!(stale.is_none());

        // Only the fresh search counted a view.
        let stored = store.entry_by_id("e1").await.unwrap().unwrap();
        assert_eq!(stored.metadata.views, 1);
    }
}
