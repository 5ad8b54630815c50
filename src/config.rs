use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub qna: QnaConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// Settings for the remote QnA answer service.
///
/// The service is optional: when `enabled` is false, or whenever the
/// endpoint is unreachable, the pipeline runs without a QnA contribution.
#[derive(Debug, Deserialize, Clone)]
pub struct QnaConfig {
    #[serde(default = "default_qna_base_url")]
    pub base_url: String,
    #[serde(default = "default_qna_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_qna_enabled")]
    pub enabled: bool,
}

impl Default for QnaConfig {
    fn default() -> Self {
        Self {
            base_url: default_qna_base_url(),
            timeout_secs: default_qna_timeout_secs(),
            enabled: default_qna_enabled(),
        }
    }
}

fn default_qna_base_url() -> String {
    "http://localhost:5001".to_string()
}
fn default_qna_timeout_secs() -> u64 {
    5
}
fn default_qna_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_expert_limit")]
    pub expert_limit: usize,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            expert_limit: default_expert_limit(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_expert_limit() -> usize {
    5
}
fn default_history_limit() -> usize {
    50
}

/// Keyword lists driving query classification.
///
/// The defaults mirror the production term sets; deployments with a
/// different vocabulary can override either list in the config file
/// without touching classifier logic.
#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_engineering_keywords")]
    pub engineering_keywords: Vec<String>,
    #[serde(default = "default_hr_keywords")]
    pub hr_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            engineering_keywords: default_engineering_keywords(),
            hr_keywords: default_hr_keywords(),
        }
    }
}

fn default_engineering_keywords() -> Vec<String> {
    [
        "code", "bug", "error", "api", "database", "deploy", "deployment",
        "crash", "performance", "server", "build", "test", "testing",
        "git", "docker", "kubernetes", "ci/cd", "production", "staging",
        "backend", "frontend", "authentication", "authorization", "cors",
        "npm", "yarn", "webpack", "babel", "typescript", "javascript",
        "python", "java", "react", "angular", "vue", "node", "express",
        "mongodb", "postgresql", "mysql", "redis", "cache", "caching",
        "microservice", "architecture", "scaling", "load balancer",
        "aws", "azure", "gcp", "cloud", "lambda", "function",
        "logging", "monitoring", "grafana", "prometheus", "elk",
        "security", "vulnerability", "ssl", "https", "certificate",
        "repository", "branch", "merge", "pull request", "commit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_hr_keywords() -> Vec<String> {
    [
        "leave", "vacation", "pto", "benefits", "payroll", "salary",
        "insurance", "onboarding", "policy", "hr", "holiday", "time off",
        "sick leave", "maternity", "paternity", "401k", "retirement",
        "health", "dental", "vision", "wellness", "mental health",
        "employee", "personnel", "hiring", "termination", "resignation",
        "performance review", "feedback", "promotion", "bonus",
        "relocation", "remote work", "wfh", "work from home",
        "team building", "culture", "diversity", "inclusion",
        "training", "development", "career", "growth",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.expert_limit < 1 {
        anyhow::bail!("search.expert_limit must be >= 1");
    }

    if config.search.history_limit < 1 {
        anyhow::bail!("search.history_limit must be >= 1");
    }

    if config.qna.timeout_secs < 1 {
        anyhow::bail!("qna.timeout_secs must be >= 1");
    }

    if config.classifier.engineering_keywords.is_empty() || config.classifier.hr_keywords.is_empty()
    {
        anyhow::bail!("classifier keyword lists must not be empty");
    }

    Ok(config)
}
