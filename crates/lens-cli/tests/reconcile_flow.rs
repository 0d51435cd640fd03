//! End-to-end integration tests for the reconcile flow.
//!
//! Tests the full pipeline: source documents → reconcile → JSON output,
//! including the incremental --as-source feedback loop.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn lens_binary() -> String {
    env!("CARGO_BIN_EXE_lens").to_string()
}

/// Run the binary with an isolated HOME so no real user config interferes.
fn run_lens(home: &Path, envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(lens_binary());
    command.env_clear().env("HOME", home);
    for (key, value) in envs {
        command.env(key, value);
    }
    command.args(args).output().expect("failed to run lens")
}

fn write_document(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "lens should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

fn fixture_documents(dir: &Path) -> (PathBuf, PathBuf) {
    let git = write_document(
        dir,
        "git.json",
        r#"{"sources":{"git":{"kind":"intervals","values":[[0.0,3600.0]]}}}"#,
    );
    let claude = write_document(
        dir,
        "claude.json",
        r#"{"sources":{"claude":{"kind":"points","values":[7600.0]}}}"#,
    );
    (git, claude)
}

#[test]
fn test_reconcile_merges_across_documents() {
    let temp = TempDir::new().unwrap();
    let (git, claude) = fixture_documents(temp.path());

    let output = run_lens(
        temp.path(),
        &[],
        &["reconcile", git.to_str().unwrap(), claude.to_str().unwrap()],
    );
    let value = stdout_json(&output);

    // 4000s gap between the commit interval and the prompt is under the
    // default 1.5h threshold, so everything merges into one session.
    let sessions = value["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert!((sessions[0]["start"].as_f64().unwrap() - 0.0).abs() < 1e-9);
    assert!((sessions[0]["end"].as_f64().unwrap() - 7600.0).abs() < 1e-9);

    let expected = 2.611; // 7600/3600 + 0.5, millihour rounding
    assert!((value["total_hours"].as_f64().unwrap() - expected).abs() < 1e-9);

    let sources = value["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
}

#[test]
fn test_as_source_output_feeds_back() {
    let temp = TempDir::new().unwrap();
    let (git, claude) = fixture_documents(temp.path());

    let first = run_lens(
        temp.path(),
        &[],
        &[
            "reconcile",
            git.to_str().unwrap(),
            claude.to_str().unwrap(),
            "--as-source",
            "merged",
        ],
    );
    assert!(first.status.success());

    // The --as-source output is itself a valid input document.
    let merged_doc = temp.path().join("merged.json");
    std::fs::write(&merged_doc, &first.stdout).unwrap();

    let second = run_lens(temp.path(), &[], &["reconcile", merged_doc.to_str().unwrap()]);
    let value = stdout_json(&second);

    let sessions = value["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert!((sessions[0]["end"].as_f64().unwrap() - 7600.0).abs() < 1e-9);
    assert!((value["total_hours"].as_f64().unwrap() - 2.611).abs() < 1e-9);
}

#[test]
fn test_gap_flag_splits_sessions() {
    let temp = TempDir::new().unwrap();
    let (git, claude) = fixture_documents(temp.path());

    let output = run_lens(
        temp.path(),
        &[],
        &[
            "reconcile",
            git.to_str().unwrap(),
            claude.to_str().unwrap(),
            "--gap-hours",
            "1.0",
        ],
    );
    let value = stdout_json(&output);

    // 4000s gap exceeds a 1h threshold: two sessions, 1.5h + floored 0.5h.
    assert_eq!(value["sessions"].as_array().unwrap().len(), 2);
    assert!((value["total_hours"].as_f64().unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn test_env_var_overrides_gap_threshold() {
    let temp = TempDir::new().unwrap();
    let (git, claude) = fixture_documents(temp.path());

    let output = run_lens(
        temp.path(),
        &[("LENS_GAP_THRESHOLD_HOURS", "1.0")],
        &["reconcile", git.to_str().unwrap(), claude.to_str().unwrap()],
    );
    let value = stdout_json(&output);

    assert_eq!(value["sessions"].as_array().unwrap().len(), 2);
    assert!((value["total_hours"].as_f64().unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn test_config_file_applies_and_flag_wins() {
    let temp = TempDir::new().unwrap();
    let (git, claude) = fixture_documents(temp.path());
    let config = write_document(temp.path(), "lens.toml", "gap_threshold_hours = 1.0\n");

    let from_file = run_lens(
        temp.path(),
        &[],
        &[
            "reconcile",
            git.to_str().unwrap(),
            claude.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
    );
    let value = stdout_json(&from_file);
    assert_eq!(value["sessions"].as_array().unwrap().len(), 2);

    // A per-invocation flag beats the config file.
    let with_flag = run_lens(
        temp.path(),
        &[],
        &[
            "reconcile",
            git.to_str().unwrap(),
            claude.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--gap-hours",
            "2.0",
        ],
    );
    let value = stdout_json(&with_flag);
    assert_eq!(value["sessions"].as_array().unwrap().len(), 1);
    assert!((value["total_hours"].as_f64().unwrap() - 2.611).abs() < 1e-9);
}

#[test]
fn test_duplicate_source_id_fails() {
    let temp = TempDir::new().unwrap();
    let first = write_document(
        temp.path(),
        "a.json",
        r#"{"sources":{"git":{"kind":"points","values":[1.0]}}}"#,
    );
    let second = write_document(
        temp.path(),
        "b.json",
        r#"{"sources":{"git":{"kind":"points","values":[2.0]}}}"#,
    );

    let output = run_lens(
        temp.path(),
        &[],
        &["reconcile", first.to_str().unwrap(), second.to_str().unwrap()],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("duplicate source ID 'git'"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_malformed_interval_fails() {
    let temp = TempDir::new().unwrap();
    let bad = write_document(
        temp.path(),
        "bad.json",
        r#"{"sources":{"git":{"kind":"intervals","values":[[3600.0,0.0]]}}}"#,
    );

    let output = run_lens(temp.path(), &[], &["reconcile", bad.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is after end"), "unexpected stderr: {stderr}");
}

#[test]
fn test_reconcile_reads_stdin() {
    let temp = TempDir::new().unwrap();

    let mut child = Command::new(lens_binary())
        .env_clear()
        .env("HOME", temp.path())
        .arg("reconcile")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn lens");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"sources":{"claude":{"kind":"points","values":[0.0,10000.0]}}}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let value = stdout_json(&output);

    // Two floored zero-duration sessions.
    assert_eq!(value["sessions"].as_array().unwrap().len(), 2);
    assert!((value["total_hours"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_empty_document_yields_zero_total() {
    let temp = TempDir::new().unwrap();
    let empty = write_document(temp.path(), "empty.json", r#"{"sources":{}}"#);

    let output = run_lens(temp.path(), &[], &["reconcile", empty.to_str().unwrap()]);
    let value = stdout_json(&output);

    assert_eq!(value["sessions"].as_array().unwrap().len(), 0);
    assert!(value["total_hours"].as_f64().unwrap().abs() < 1e-9);
}

#[test]
fn test_inspect_reports_per_source_breakdown() {
    let temp = TempDir::new().unwrap();
    let (git, claude) = fixture_documents(temp.path());

    let output = run_lens(
        temp.path(),
        &[],
        &["inspect", git.to_str().unwrap(), claude.to_str().unwrap()],
    );
    let value = stdout_json(&output);

    let sources = value["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);

    // BTreeMap ordering: claude before git.
    assert_eq!(sources[0]["id"], "claude");
    assert_eq!(sources[0]["kind"], "points");
    assert_eq!(sources[0]["events"], 1);
    assert_eq!(sources[1]["id"], "git");
    assert!((sources[1]["tracked_hours"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}
