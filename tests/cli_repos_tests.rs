//! End-to-end tests for `librarian repos` commands.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the librarian binary
fn librarian_bin() -> &'static str {
    env!("CARGO_BIN_EXE_librarian")
}

fn run(args: &[&str], config_dir: &Path) -> Output {
    Command::new(librarian_bin())
        .env("LIBRARIAN_CONFIG_DIR", config_dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn list_json(config_dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["repos", "list", "--json"];
    args.extend_from_slice(extra);
    let output = run(&args, config_dir);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Should parse JSON output")
}

#[test]
fn test_list_empty_store() {
    let dir = TempDir::new().unwrap();
    let result = list_json(dir.path(), &[]);

    let families = result["families"].as_array().unwrap();
    assert_eq!(families.len(), 3);
    assert!(families
        .iter()
        .all(|group| group["sources"].as_array().unwrap().is_empty()));
    assert_eq!(result["visibility"]["hideLucideIcons"], false);
}

#[test]
fn test_add_then_list() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &[
            "repos",
            "add",
            "--family",
            "components",
            "--url",
            "https://cdn.example.com/npm/shad-ui@1.2.3",
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("shad ui"));

    let output = run(
        &[
            "repos",
            "add",
            "--family",
            "icons",
            "--url",
            "https://icons.example.com/brand.json",
            "--name",
            "Brand icons",
        ],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));

    let result = list_json(dir.path(), &["--family", "icons"]);
    let families = result["families"].as_array().unwrap();
    assert_eq!(families.len(), 1);
    assert_eq!(families[0]["family"], "icons");
    assert_eq!(families[0]["sources"][0]["name"], "Brand icons");

    // Written in the current format under the shared keys.
    let stored: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("repos.json")).unwrap()).unwrap();
    assert_eq!(
        stored["customComponentRepos"][0]["url"],
        "https://cdn.example.com/npm/shad-ui@1.2.3"
    );
}

#[test]
fn test_legacy_entries_are_migrated() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("repos.json"),
        r#"{
            "customBlockRepos": ["https://registry.example.com/blocks/marketing-kit@2.0.1", 42],
            "hideSerpBlocks": true
        }"#,
    )
    .unwrap();

    let result = list_json(dir.path(), &["--family", "blocks"]);
    let sources = result["families"][0]["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["name"], "marketing kit");
    assert_eq!(sources[1]["name"], "Custom Repository");
    assert_eq!(sources[1]["url"], "");
    assert_eq!(result["visibility"]["hideSerpBlocks"], true);

    let active = list_json(dir.path(), &["--family", "blocks", "--active"]);
    assert_eq!(
        active["families"][0]["sources"].as_array().unwrap().len(),
        1
    );
}

#[test]
fn test_remove_by_index() {
    let dir = TempDir::new().unwrap();
    for url in ["https://a.example.com/one", "https://b.example.com/two"] {
        let output = run(
            &["repos", "add", "--family", "blocks", "--url", url],
            dir.path(),
        );
        assert_eq!(output.status.code(), Some(0));
    }

    let output = run(
        &["repos", "remove", "--family", "blocks", "--index", "0"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));

    let result = list_json(dir.path(), &["--family", "blocks"]);
    let sources = result["families"][0]["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["url"], "https://b.example.com/two");
}

#[test]
fn test_remove_out_of_range_is_not_found() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &["repos", "remove", "--family", "components", "--index", "5"],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_add_empty_url_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &["repos", "add", "--family", "components", "--url", "  "],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("repos.json").exists());
}

#[test]
fn test_visibility_toggle() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &["repos", "visibility", "lucide-icons", "--hide"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        list_json(dir.path(), &[])["visibility"]["hideLucideIcons"],
        true
    );

    let output = run(&["repos", "visibility", "lucide-icons"], dir.path());
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        list_json(dir.path(), &[])["visibility"]["hideLucideIcons"],
        false
    );
}

#[test]
fn test_corrupt_store_is_treated_as_empty_and_rewritten() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("repos.json"), "[1, 2").unwrap();

    let result = list_json(dir.path(), &[]);
    assert!(result["families"]
        .as_array()
        .unwrap()
        .iter()
        .all(|group| group["sources"].as_array().unwrap().is_empty()));

    let output = run(
        &["repos", "visibility", "serp-blocks", "--hide"],
        dir.path(),
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stored: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("repos.json")).unwrap()).unwrap();
    assert_eq!(stored["hideSerpBlocks"], true);
}
