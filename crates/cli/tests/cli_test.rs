//! CLI integration tests.

#![allow(deprecated)] // Command::cargo_bin deprecated for custom build-dir; still works for default

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A command isolated from the user's config file.
fn booklistings(config_home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("booklistings").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("BOOKLISTINGS_SEARCH_URL");
    cmd
}

async fn catalog(body: serde_json::Value, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn two_books() -> serde_json::Value {
    json!({
        "totalItems": 2,
        "items": [
            { "volumeInfo": { "title": "Android Basics", "authors": ["Jo Dev"], "infoLink": "https://books.test/1" } },
            { "volumeInfo": { "title": "Kotlin in Depth", "infoLink": "https://books.test/2" } }
        ]
    })
}

#[test]
fn help_prints_and_exits_success() {
    Command::cargo_bin("booklistings")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn config_show_runs() {
    let home = tempfile::tempdir().unwrap();
    booklistings(&home).args(["config", "show"]).assert().success();
}

#[test]
fn config_show_json_valid() {
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home).args(["config", "show", "--json"]).assert().success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout).expect("config show --json should output valid JSON");
    assert_eq!(v["search"]["max_results"], 10);
}

#[test]
fn config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    booklistings(&home)
        .args(["config", "set", "thumbnails.max_dimension", "64"])
        .assert()
        .success();
    let out = booklistings(&home).args(["config", "show", "--json"]).assert().success();
    let v: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(v["thumbnails"]["max_dimension"], 64);
}

#[test]
fn config_set_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    booklistings(&home).args(["config", "set", "search.colour", "blue"]).assert().failure();
}

#[test]
fn blank_term_is_refused() {
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home).args(["search", "   "]).assert().failure();
    let stderr = std::str::from_utf8(&out.get_output().stderr).unwrap();
    assert!(stderr.contains("No search term entered"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_lists_books() {
    let server = catalog(two_books(), 200).await;
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home)
        .env("BOOKLISTINGS_SEARCH_URL", format!("{}/books/v1/volumes", server.uri()))
        .args(["search", "android"])
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    assert!(stdout.contains("Android Basics"));
    assert!(stdout.contains("by Jo Dev"));
    assert!(stdout.contains("by Unknown"));
    assert!(stdout.contains("no cover"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_json_output() {
    let server = catalog(two_books(), 200).await;
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home)
        .env("BOOKLISTINGS_SEARCH_URL", format!("{}/books/v1/volumes", server.uri()))
        .args(["search", "android", "--json", "--no-covers"])
        .assert()
        .success();
    let rows: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["title"], "Kotlin in Depth");
    assert_eq!(rows[1]["detail_url"], "https://books.test/2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_without_matches_shows_empty_state() {
    let server = catalog(json!({ "items": [] }), 200).await;
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home)
        .env("BOOKLISTINGS_SEARCH_URL", format!("{}/books/v1/volumes", server.uri()))
        .args(["search", "zzzznoresults"])
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    assert!(stdout.contains("No books found."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn catalog_error_fails_with_connectivity_message() {
    let server = catalog(json!({ "error": "backend" }), 500).await;
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home)
        .env("BOOKLISTINGS_SEARCH_URL", format!("{}/books/v1/volumes", server.uri()))
        .args(["search", "android"])
        .assert()
        .failure();
    let stderr = std::str::from_utf8(&out.get_output().stderr).unwrap();
    assert!(stderr.contains("Couldn't reach the book catalog"));
}

#[test]
fn config_set_refuses_to_overwrite_broken_file() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("booklistings");
    std::fs::create_dir_all(&dir).unwrap();
    let broken = "[search\nbase_url = \"https://catalog.test\"\n";
    std::fs::write(dir.join("config.toml"), broken).unwrap();

    booklistings(&home)
        .args(["config", "set", "thumbnails.max_dimension", "64"])
        .assert()
        .failure();
    assert_eq!(std::fs::read_to_string(dir.join("config.toml")).unwrap(), broken);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn browse_opens_on_default_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .and(query_param("q", "android"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_books()))
        .expect(1)
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home)
        .env("BOOKLISTINGS_SEARCH_URL", format!("{}/books/v1/volumes", server.uri()))
        .args(["browse", "--no-covers"])
        .write_stdin("quit\n")
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    assert!(stdout.contains("Android Basics"));
    assert!(stdout.contains("Kotlin in Depth"));
}

#[test]
fn browse_offline_starts_on_connectivity_message() {
    let home = tempfile::tempdir().unwrap();
    let out = booklistings(&home)
        .env("BOOKLISTINGS_SEARCH_URL", "http://catalog.invalid/books/v1/volumes")
        .args(["browse", "--no-covers"])
        .write_stdin("quit\n")
        .assert()
        .success();
    let stdout = std::str::from_utf8(&out.get_output().stdout).unwrap();
    assert!(stdout.contains("Couldn't reach the book catalog"));
    assert!(!stdout.contains("by "));
}
