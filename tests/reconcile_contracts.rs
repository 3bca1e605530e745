//! Reconcile command output contracts and batch fail-fast behavior.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use treegraft::config::MigrationConfig;
use treegraft::tooling::cli::{CliContext, Commands};

fn context() -> CliContext {
    CliContext::with_config(MigrationConfig::default())
}

fn write_target(
    dir: &Path,
    primary: &serde_json::Value,
    secondary: &serde_json::Value,
    target: &serde_json::Value,
) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("source-links.json"),
        serde_json::to_string(primary).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("cache-links.json"),
        serde_json::to_string(secondary).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("migrated-links.json"),
        serde_json::to_string(target).unwrap(),
    )
    .unwrap();
}

#[test]
fn clean_target_passes_with_pass_verdict() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    write_target(
        &store,
        &serde_json::json!([{ "linkURL": "https://x.com/a" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/a" }]),
    );

    let output = context()
        .execute(&Commands::Reconcile {
            target: store,
            all: false,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(!output.failed_verdict);
    assert!(output.text.contains("PASS"));
}

#[test]
fn reconcile_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    write_target(
        &store,
        &serde_json::json!([{ "linkURL": "/a" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/a", "text": "<a href=\"/a\">dup</a>" }]),
    );

    let output = context()
        .execute(&Commands::Reconcile {
            target: store,
            all: false,
            format: "json".to_string(),
        })
        .unwrap();
    // Hard count mismatch: /a appears under linkURL and href in the target.
    assert!(output.failed_verdict);

    let parsed: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(parsed.get("verdict").and_then(|v| v.as_bool()), Some(false));
    assert!(parsed
        .get("primary")
        .and_then(|p| p.get("unique_urls"))
        .and_then(|v| v.as_u64())
        .is_some());
    assert!(parsed
        .get("missing_in_target")
        .and_then(|v| v.as_array())
        .is_some());
    assert!(parsed
        .get("orphan_in_target")
        .and_then(|v| v.as_array())
        .is_some());

    let mismatches = parsed
        .get("count_mismatches")
        .and_then(|v| v.as_array())
        .expect("count_mismatches array should exist");
    assert_eq!(mismatches.len(), 1);
    let entry = &mismatches[0];
    assert_eq!(entry.get("url").and_then(|v| v.as_str()), Some("/a"));
    assert_eq!(entry.get("target_count").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(entry.get("primary_count").and_then(|v| v.as_u64()), Some(1));
}

#[test]
fn soft_presence_failure_fails_verdict_without_hard_mismatch() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    write_target(
        &store,
        &serde_json::json!([{ "linkURL": "/a" }, { "url": "/gone" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/a" }]),
    );

    let output = context()
        .execute(&Commands::Reconcile {
            target: store,
            all: false,
            format: "json".to_string(),
        })
        .unwrap();
    assert!(output.failed_verdict);

    let parsed: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(
        parsed
            .get("count_mismatches")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(0)
    );
    assert_eq!(
        parsed
            .get("missing_in_target")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(1)
    );
}

#[test]
fn missing_source_artifact_is_an_error_with_file_identity() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    fs::create_dir_all(&store).unwrap();
    fs::write(store.join("source-links.json"), "[]").unwrap();

    let err = context()
        .execute(&Commands::Reconcile {
            target: store,
            all: false,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("cache-links.json"));
}

#[test]
fn batch_aborts_on_hard_failure_and_skips_later_targets() {
    let temp = TempDir::new().unwrap();
    write_target(
        &temp.path().join("a-store"),
        &serde_json::json!([{ "linkURL": "/a" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/a", "text": "<a href=\"/a\">dup</a>" }]),
    );
    write_target(
        &temp.path().join("b-store"),
        &serde_json::json!([{ "linkURL": "/b" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/b" }]),
    );

    let output = context()
        .execute(&Commands::Batch {
            root: temp.path().to_path_buf(),
            all: false,
        })
        .unwrap();
    assert!(output.failed_verdict);
    assert!(output.text.contains("a-store"));
    assert!(output.text.contains("Batch aborted"));
    assert!(!output.text.contains("b-store"));
}

#[test]
fn batch_continues_past_soft_failures_and_reports_every_target() {
    let temp = TempDir::new().unwrap();
    write_target(
        &temp.path().join("a-store"),
        &serde_json::json!([{ "linkURL": "/a" }, { "url": "/gone" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/a" }]),
    );
    write_target(
        &temp.path().join("b-store"),
        &serde_json::json!([{ "linkURL": "/b" }]),
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/b" }]),
    );

    let output = context()
        .execute(&Commands::Batch {
            root: temp.path().to_path_buf(),
            all: false,
        })
        .unwrap();
    // Soft failure in a-store fails the overall verdict but b-store runs.
    assert!(output.failed_verdict);
    assert!(output.text.contains("a-store"));
    assert!(output.text.contains("b-store"));
    assert!(!output.text.contains("Batch aborted"));
}

#[test]
fn secondary_cache_satisfies_fidelity_when_primary_lacks_url() {
    let temp = TempDir::new().unwrap();
    let store = temp.path().join("store");
    write_target(
        &store,
        &serde_json::json!([]),
        &serde_json::json!([{ "linkURL": "/cached" }]),
        &serde_json::json!([{ "linkURL": "/cached" }]),
    );

    let output = context()
        .execute(&Commands::Reconcile {
            target: store,
            all: false,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(!output.failed_verdict);
}
