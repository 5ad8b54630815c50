use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn navify_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("navify");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[store]
path = "{}/data/navify.sqlite"

[qna]
enabled = false

[search]
expert_limit = 5
history_limit = 50
"#,
        root.display()
    );

    let config_path = config_dir.join("navify.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_navify(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = navify_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run navify binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_and_seeds_store() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_navify(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("seeded"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_navify(&config_path, &["init"]);
    let (stdout2, _, success2) = run_navify(&config_path, &["init"]);
    assert!(success1);
    assert!(success2);
    assert!(stdout2.contains("already seeded"));
}

#[test]
fn test_search_multiple_solutions_shows_ranked_list() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (stdout, stderr, success) = run_navify(&config_path, &["search", "database"]);
    assert!(success, "search failed: {}", stderr);
    assert!(stdout.contains("classified as engineering"));
    assert!(stdout.contains("result(s)"));

    // Both database entries appear; the more helpful one ranks first.
    let migration = stdout.find("Database migration best practices").unwrap();
    let api_500 = stdout.find("API returns 500 error").unwrap();
    assert!(migration < api_500);
}

#[test]
fn test_search_single_solution_opens_detail() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (stdout, _, success) = run_navify(&config_path, &["search", "parental leave"]);
    assert!(success);
    assert!(stdout.contains("classified as hr"));
    assert!(stdout.contains("opening it"));
    assert!(stdout.contains("How to request parental leave"));
    assert!(stdout.contains("Download parental leave form from HR portal"));
}

#[test]
fn test_blank_search_is_noop() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (stdout, _, success) = run_navify(&config_path, &["search", "   "]);
    assert!(success);
    assert!(stdout.contains("Nothing to search."));

    let (history, _, _) = run_navify(&config_path, &["history"]);
    assert!(history.contains("No search history."));
}

#[test]
fn test_get_and_rate_entry() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (stdout, _, success) = run_navify(&config_path, &["get", "k1"]);
    assert!(success);
    assert!(stdout.contains("API returns 500 error"));
    assert!(stdout.contains("connection pool"));

    let (stdout, _, success) = run_navify(&config_path, &["rate", "k1", "--helpful"]);
    assert!(success);
    assert!(stdout.contains("+13/-1"));

    let (stdout, _, success) = run_navify(&config_path, &["rate", "k1", "--not-helpful"]);
    assert!(success);
    assert!(stdout.contains("+13/-2"));
}

#[test]
fn test_get_missing_entry_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (_, stderr, success) = run_navify(&config_path, &["get", "nope"]);
    assert!(!success);
    assert!(stderr.contains("entry not found"));
}

#[test]
fn test_rate_missing_entry_is_noop() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (stdout, _, success) = run_navify(&config_path, &["rate", "nope", "--helpful"]);
    assert!(success);
    assert!(stdout.contains("nothing rated"));
}

#[test]
fn test_history_newest_first() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    run_navify(&config_path, &["search", "database"]);
    run_navify(&config_path, &["search", "kubernetes"]);

    let (stdout, _, success) = run_navify(&config_path, &["history"]);
    assert!(success);
    let kubernetes = stdout.find("kubernetes").unwrap();
    let database = stdout.find("database").unwrap();
    assert!(kubernetes < database);
}

#[test]
fn test_experts_ranked_by_match_then_rating() {
    let (_tmp, config_path) = setup_test_env();
    run_navify(&config_path, &["init"]);

    let (stdout, _, success) = run_navify(&config_path, &["experts", "kubernetes", "docker"]);
    assert!(success);
    // One match each; Sarah's higher rating breaks the tie.
    let sarah = stdout.find("Sarah Johnson").unwrap();
    let john = stdout.find("John Smith").unwrap();
    assert!(sarah < john);
    assert!(!stdout.contains("Jane Smith"));
}

#[test]
fn test_search_survives_unreachable_qna() {
    let (tmp, _) = setup_test_env();
    let root = tmp.path();

    // QnA enabled but pointing at a dead port: the pipeline must degrade.
    let config_content = format!(
        r#"[store]
path = "{}/data/navify.sqlite"

[qna]
enabled = true
base_url = "http://127.0.0.1:1"
timeout_secs = 1
"#,
        root.display()
    );
    let config_path = root.join("config").join("navify.toml");
    fs::write(&config_path, config_content).unwrap();

    run_navify(&config_path, &["init"]);
    let (stdout, stderr, success) = run_navify(&config_path, &["search", "database"]);
    assert!(success, "search failed: {}", stderr);
    assert!(stdout.contains("result(s)"));
}
