//! Keyword-density query classification.
//!
//! Maps a free-text query to a coarse domain (engineering / hr / general)
//! and extracts the technical terms used downstream for expert and
//! documentation matching. This is a deliberately cheap heuristic rather
//! than a model: matching is substring containment against fixed keyword
//! lists, so results are deterministic and reproducible in tests.

use crate::config::ClassifierConfig;
use crate::models::{ClassificationResult, QueryCategory};

pub struct Classifier {
    engineering: Vec<String>,
    hr: Vec<String>,
}

impl Classifier {
    /// Build a classifier from the configured keyword lists. Keywords are
    /// expected to be lower-case; matching lower-cases the query, not the
    /// lists.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            engineering: config.engineering_keywords.clone(),
            hr: config.hr_keywords.clone(),
        }
    }

    /// Classify a query.
    ///
    /// Selection policy: hr wins only when its match count strictly exceeds
    /// engineering's; any nonzero engineering count otherwise wins; zero
    /// matches on both sides falls back to general with confidence 0.5.
    pub fn classify(&self, query: &str) -> ClassificationResult {
        let lower = query.to_lowercase();

        let eng_matches = count_matches(&lower, &self.engineering);
        let hr_matches = count_matches(&lower, &self.hr);

        let word_count = query.split_whitespace().count().max(1);

        let (category, confidence, matched) = if hr_matches > eng_matches {
            (
                QueryCategory::Hr,
                confidence(hr_matches, word_count),
                matched_keywords(&lower, &self.hr),
            )
        } else if eng_matches > 0 {
            (
                QueryCategory::Engineering,
                confidence(eng_matches, word_count),
                matched_keywords(&lower, &self.engineering),
            )
        } else {
            (QueryCategory::General, 0.5, Vec::new())
        };

        let mut keywords = matched;
        keywords.truncate(5);

        ClassificationResult {
            category,
            confidence,
            keywords,
        }
    }

    /// Extract lookup terms for expert and documentation matching: the
    /// engineering keywords found in the query, followed by every
    /// capitalized word token (lower-cased), duplicates removed keeping
    /// the first occurrence.
    pub fn extract_technical_terms(&self, query: &str) -> Vec<String> {
        let lower = query.to_lowercase();
        let mut terms = matched_keywords(&lower, &self.engineering);

        for token in capitalized_tokens(query) {
            terms.push(token.to_lowercase());
        }

        let mut seen = Vec::with_capacity(terms.len());
        for term in terms {
            if !seen.contains(&term) {
                seen.push(term);
            }
        }
        seen
    }
}

fn count_matches(lower_query: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|k| lower_query.contains(k.as_str())).count()
}

fn matched_keywords(lower_query: &str, keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| lower_query.contains(k.as_str()))
        .cloned()
        .collect()
}

fn confidence(matches: usize, word_count: usize) -> f64 {
    let density = matches as f64 / word_count as f64;
    (0.5 + density).min(0.95)
}

/// Word tokens (ASCII alphanumeric runs) starting with an upper-case
/// letter and at least two characters long.
fn capitalized_tokens(query: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in query.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c);
        } else {
            push_if_capitalized(&mut tokens, &current);
            current.clear();
        }
    }
    push_if_capitalized(&mut tokens, &current);

    tokens
}

fn push_if_capitalized(tokens: &mut Vec<String>, token: &str) {
    if token.len() >= 2 && token.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        tokens.push(token.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;

    fn classifier() -> Classifier {
        Classifier::new(&ClassifierConfig::default())
    }

    #[test]
    fn test_classify_is_deterministic() {
        let c = classifier();
        let a = c.classify("docker build fails with a cache error");
        let b = c.classify("docker build fails with a cache error");
        assert_eq!(a, b);

        let ta = c.extract_technical_terms("Kubernetes pod crash in Production");
        let tb = c.extract_technical_terms("Kubernetes pod crash in Production");
        assert_eq!(ta, tb);
    }

    #[test]
    fn test_hr_wins_only_on_strict_majority() {
        let c = classifier();

        // Two engineering matches (deploy/deployment/bug all hit via
        // substring), two hr matches (leave, policy), so the tie goes to
        // engineering.
        let result = c.classify("leave policy for deployment bug");
        assert_eq!(result.category, QueryCategory::Engineering);

        let result = c.classify("parental leave policy and payroll");
        assert_eq!(result.category, QueryCategory::Hr);
    }

    #[test]
    fn test_general_fallback() {
        let c = classifier();
        let result = c.classify("where is the office coffee machine");
        assert_eq!(result.category, QueryCategory::General);
        assert_eq!(result.confidence, 0.5);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_empty_query_is_general() {
        let c = classifier();
        let result = c.classify("");
        assert_eq!(result.category, QueryCategory::General);
        assert_eq!(result.confidence, 0.5);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_confidence_bounds() {
        let c = classifier();

        // Dense technical query saturates at 0.95
        let result = c.classify("docker kubernetes api bug");
        assert_eq!(result.category, QueryCategory::Engineering);
        assert!(result.confidence <= 0.95);
        assert!(result.confidence >= 0.5);

        // Sparse match stays near the floor
        let result =
            c.classify("my colleague mentioned something about a bug in the meeting yesterday");
        assert_eq!(result.category, QueryCategory::Engineering);
        assert!(result.confidence > 0.5 && result.confidence < 0.6);
    }

    #[test]
    fn test_keywords_in_list_order_capped_at_five() {
        let c = classifier();
        let result = c.classify(
            "code bug error api database deploy crash performance server build",
        );
        assert_eq!(result.keywords.len(), 5);
        // Keyword-list order, not query order
        assert_eq!(result.keywords, vec!["code", "bug", "error", "api", "database"]);
    }

    #[test]
    fn test_substring_matching_not_tokenized() {
        let c = classifier();
        // "deployment" contains "deploy"; both keywords match the one word.
        let result = c.classify("deployment");
        assert_eq!(result.category, QueryCategory::Engineering);
        assert!(result.keywords.contains(&"deploy".to_string()));
        assert!(result.keywords.contains(&"deployment".to_string()));
    }

    #[test]
    fn test_technical_terms_union_and_order() {
        let c = classifier();
        let terms = c.extract_technical_terms("Terraform docker deploy issue");
        // Engineering matches first (list order), then capitalized tokens.
        assert_eq!(terms, vec!["deploy", "docker", "terraform"]);
    }

    #[test]
    fn test_technical_terms_dedup_keeps_first() {
        let c = classifier();
        // "docker" matches the keyword list and appears capitalized; the
        // capitalized duplicate is dropped.
        let terms = c.extract_technical_terms("Docker daemon crash");
        assert_eq!(terms, vec!["crash", "docker"]);
    }

    #[test]
    fn test_technical_terms_empty_query() {
        let c = classifier();
        assert!(c.extract_technical_terms("").is_empty());
    }
}
