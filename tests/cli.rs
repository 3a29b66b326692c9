use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const SEPARATOR: &str = "\n\n---LINKABLE SECTIONS---\n";

fn write_page(site: &Path, rel: &str, html: &str) {
    let path = site.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, html).unwrap();
}

fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");
    write_page(
        &site,
        "index.html",
        r#"<html><head><title>Home</title></head><body><article role="main"><p>Welcome</p></article></body></html>"#,
    );
    write_page(
        &site,
        "install/index.html",
        r#"<html><head><title>Install</title></head><body><article role="main"><p>Run the installer.</p><h2 id="step-1">Step 1</h2><p>Download.</p></article></body></html>"#,
    );
    write_page(
        &site,
        "blank/index.html",
        r#"<html><head><title>Blank</title></head><body><article role="main">
        </article></body></html>"#,
    );
    dir
}

fn sitecorpus() -> Command {
    let mut cmd = Command::cargo_bin("sitecorpus").unwrap();
    cmd.env_remove("SITECORPUS_SITE_URL");
    cmd
}

fn read_corpus(path: &Path) -> Vec<serde_json::Value> {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn build_writes_ordered_corpus() {
    let dir = sample_project();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "build", "--site-url", "https://x/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages: 3"));

    let corpus = read_corpus(&dir.path().join("site").join("content.json"));
    let urls: Vec<&str> = corpus.iter().map(|p| p["url"].as_str().unwrap()).collect();
    assert_eq!(urls, vec!["https://x/blank/", "https://x/", "https://x/install/"]);

    assert_eq!(corpus[0]["content"], SEPARATOR);
    assert_eq!(
        corpus[2]["content"],
        format!(
            "Run the installer. Step 1 Download.{}[ANCHOR: #step-1] Step 1 Download. [/ANCHOR]",
            SEPARATOR
        )
    );
}

#[test]
fn build_twice_is_byte_identical() {
    let dir = sample_project();
    let corpus_path = dir.path().join("site").join("content.json");

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "build"])
        .assert()
        .success();
    let first = std::fs::read(&corpus_path).unwrap();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "build"])
        .assert()
        .success();
    assert_eq!(first, std::fs::read(&corpus_path).unwrap());
}

#[test]
fn build_reads_site_url_from_env() {
    let dir = sample_project();

    sitecorpus()
        .env("SITECORPUS_SITE_URL", "https://env.example/docs")
        .args(["--path", dir.path().to_str().unwrap(), "-o", "json", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pages\": 3"));

    let corpus = read_corpus(&dir.path().join("site").join("content.json"));
    assert_eq!(corpus[1]["url"], "https://env.example/docs/");
}

#[test]
fn build_fails_when_output_directory_is_missing() {
    let dir = sample_project();
    let output = dir.path().join("nowhere").join("content.json");

    sitecorpus()
        .args([
            "--path",
            dir.path().to_str().unwrap(),
            "build",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write corpus"))
        .stderr(predicate::str::contains("nowhere"));

    assert!(!output.exists());
}

#[test]
fn build_without_site_dir_fails() {
    let dir = TempDir::new().unwrap();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Site directory not found"));
}

#[test]
fn build_respects_config_file() {
    let dir = sample_project();
    std::fs::write(
        dir.path().join("sitecorpus.toml"),
        "corpus_file = \"corpus.json\"\nexclude_patterns = [\"blank/**\"]\n",
    )
    .unwrap();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "build"])
        .assert()
        .success();

    let corpus = read_corpus(&dir.path().join("site").join("corpus.json"));
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus[0]["url"], "/");
}

#[test]
fn extract_reads_stdin() {
    let html = r#"<article role="main"><p>Run the installer.</p><h2 id="step-1">Step 1</h2><p>Download.</p></article>"#;

    let output = sitecorpus()
        .args(["-o", "json", "extract", "-", "--title", "Install", "--url", "https://x/install/"])
        .write_stdin(html)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let record: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(record["title"], "Install");
    assert_eq!(record["url"], "https://x/install/");
    assert!(record["content"]
        .as_str()
        .unwrap()
        .ends_with("[ANCHOR: #step-1] Step 1 Download. [/ANCHOR]"));
}

#[test]
fn extract_reports_skipped_page() {
    sitecorpus()
        .args(["extract", "-"])
        .write_stdin("<p>no container</p>")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No content container"));
}

#[test]
fn inspect_lists_deep_links() {
    let dir = sample_project();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "build", "--site-url", "https://x/"])
        .assert()
        .success();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "inspect", "--anchors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://x/install/#step-1"))
        .stdout(predicate::str::contains("3 pages, 1 anchor sections"));
}

#[test]
fn config_reset_writes_defaults() {
    let dir = TempDir::new().unwrap();

    sitecorpus()
        .args(["--path", dir.path().to_str().unwrap(), "config", "--reset", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("content.json"));

    let saved = std::fs::read_to_string(dir.path().join("sitecorpus.toml")).unwrap();
    assert!(saved.contains("corpus_file = \"content.json\""));
}
