//! Tests for the default metrics summary

use crate::helpers::*;
use anyhow::Result;
use serde_json::{Value, json};

const WINDOW: [&str; 4] = ["--since", "2024-01-01", "--until", "2024-01-10"];

fn window_and<'a>(extra: &[&'a str]) -> Vec<&'a str> {
  let mut args = WINDOW.to_vec();
  args.extend_from_slice(extra);
  args
}

fn without_option(mut summary: Value) -> Value {
  if let Some(fields) = summary.as_object_mut() {
    fields.remove("option");
  }
  summary
}

#[test]
fn test_metrics_summary() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let summary = four_keys_json(&repo.path, &WINDOW)?;

  // 3 releases over [2024-01-01, 2024-01-11)
  assert_eq!(summary["deploymentFrequency"], json!(0.3));
  // lead times 1d, 1d, 0
  assert_eq!(summary["leadTimeForChanges"], json!({ "value": 16.0, "unit": "hours" }));
  // v1.0.0 fails on day 1, v1.1.0 restores on day 3
  assert_eq!(summary["timeToRestoreServices"], json!({ "value": 2.0, "unit": "days" }));
  let rate = summary["changeFailureRate"].as_f64().unwrap();
  assert!((rate - 1.0 / 3.0).abs() < 1e-9);

  assert_eq!(summary["option"]["since"], "2024-01-01T00:00:00Z");
  assert_eq!(summary["option"]["until"], "2024-01-11T00:00:00Z");
  assert_eq!(summary["option"]["traversal"], "native");
  assert_eq!(summary["option"]["fixCommitPattern"], "hotfix");

  Ok(())
}

#[test]
fn test_traversals_agree() -> Result<()> {
  let repo = TestRepo::release_history()?;

  let native = four_keys_json(&repo.path, &window_and(&["--traversal", "native"]))?;
  let in_process = four_keys_json(&repo.path, &window_and(&["--traversal", "in-process"]))?;

  assert_eq!(in_process["option"]["traversal"], "in-process");
  assert_eq!(without_option(native), without_option(in_process));

  Ok(())
}

#[test]
fn test_in_process_runs_without_git() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let with_git = four_keys_json(&repo.path, &window_and(&["--traversal", "in-process"]))?;

  let output = four_keys_without_git(&repo.path, &window_and(&["--traversal", "in-process"]))?;
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  let without_git: Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(with_git, without_git);

  // the native traversal needs git and says so
  let output = four_keys_without_git(&repo.path, &WINDOW)?;
  assert_eq!(output.status.code(), Some(2));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("git rev-parse"), "{stderr}");

  Ok(())
}

#[test]
fn test_remote_url_is_cloned() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let elsewhere = tempfile::TempDir::new()?;
  let url = format!("file://{}", repo.path_str());

  let remote = four_keys_json(elsewhere.path(), &window_and(&["--repository", url.as_str()]))?;
  let local = four_keys_json(&repo.path, &WINDOW)?;

  assert_eq!(remote["option"]["traversal"], "in-process");
  assert_eq!(remote["option"]["repository"], url.as_str());
  assert_eq!(without_option(remote), without_option(local));

  Ok(())
}

#[test]
fn test_repository_flag_with_local_path() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let elsewhere = tempfile::TempDir::new()?;
  let path = repo.path_str();

  let summary = four_keys_json(elsewhere.path(), &window_and(&["-r", path.as_str()]))?;
  assert_eq!(summary["deploymentFrequency"], json!(0.3));

  Ok(())
}

#[test]
fn test_window_without_releases() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let summary = four_keys_json(&repo.path, &["--since", "2023-01-01", "--until", "2023-01-30"])?;

  assert_eq!(summary["deploymentFrequency"], json!(0.0));
  assert_eq!(summary["leadTimeForChanges"], json!({ "value": 0.0, "unit": "seconds" }));
  assert_eq!(summary["timeToRestoreServices"], json!({ "value": 0.0, "unit": "seconds" }));
  assert_eq!(summary["changeFailureRate"], json!(0.0));

  Ok(())
}

#[test]
fn test_repository_without_tags() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.commit("initial", BASE)?;

  let summary = four_keys_json(&repo.path, &WINDOW)?;
  assert_eq!(summary["deploymentFrequency"], json!(0.0));
  assert_eq!(summary["changeFailureRate"], json!(0.0));

  Ok(())
}

#[test]
fn test_pretty_output_and_quiet_stderr() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let output = four_keys(&repo.path, &window_and(&["--pretty"]))?;

  assert!(output.status.success());
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.trim_start().starts_with("{\n"));
  serde_json::from_str::<Value>(&stdout)?;
  // nothing is logged without --debug or --timer
  assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));

  Ok(())
}

#[test]
fn test_timer_logs_phases_to_stderr() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let output = four_keys(&repo.path, &window_and(&["--timer"]))?;

  assert!(output.status.success());
  serde_json::from_slice::<Value>(&output.stdout)?;
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("query_releases"), "{stderr}");
  assert!(stderr.contains("query_tags"), "{stderr}");

  Ok(())
}
