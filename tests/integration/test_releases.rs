//! Tests for `four-keys releases`

use crate::helpers::*;
use anyhow::Result;
use serde_json::{Value, json};

fn releases(repo: &TestRepo, extra: &[&str]) -> Result<Vec<Value>> {
  let args = [&["releases", "--since", "2024-01-01", "--until", "2024-01-10"][..], extra].concat();
  let output = four_keys_json(&repo.path, &args)?;
  Ok(output["releases"].as_array().cloned().unwrap_or_default())
}

fn tags(releases: &[Value]) -> Vec<&str> {
  releases.iter().filter_map(|r| r["tag"].as_str()).collect()
}

#[test]
fn test_releases_are_classified_oldest_first() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let releases = releases(&repo, &[])?;

  assert_eq!(tags(&releases), vec!["v1.0.0", "v1.1.0", "v1.2.0"]);

  assert_eq!(
    releases[0],
    json!({
      "tag": "v1.0.0",
      "date": "2024-01-02T12:00:00Z",
      "leadTimeForChanges": DAY,
      "result": { "isSuccess": false }
    })
  );
  assert_eq!(releases[1]["result"], json!({ "isSuccess": true, "timeToRestore": 2 * DAY }));
  assert_eq!(releases[1]["leadTimeForChanges"], json!(DAY));
  assert_eq!(releases[2]["result"], json!({ "isSuccess": true }));
  assert_eq!(releases[2]["leadTimeForChanges"], json!(0));

  Ok(())
}

#[test]
fn test_ignore_pattern_skips_tags() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let releases = releases(&repo, &["--ignore-pattern", r"^v1\.2"])?;

  assert_eq!(tags(&releases), vec!["v1.0.0", "v1.1.0"]);
  assert_eq!(releases[0]["result"]["isSuccess"], false);

  Ok(())
}

#[test]
fn test_custom_fix_commit_pattern() -> Result<()> {
  let repo = TestRepo::release_history()?;
  // "feature c" is the only commit in the v1.1.0..v1.2.0 range
  let releases = releases(&repo, &["--fix-commit-pattern", "feature c"])?;

  let outcomes: Vec<bool> = releases.iter().filter_map(|r| r["result"]["isSuccess"].as_bool()).collect();
  assert_eq!(outcomes, vec![true, false, true]);
  assert_eq!(releases[2]["result"]["timeToRestore"], json!(2 * DAY));

  Ok(())
}

#[test]
fn test_window_bounds_keep_full_ranges() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let output = four_keys_json(&repo.path, &["releases", "--since", "2024-01-03", "--until", "2024-01-10"])?;
  let releases = output["releases"].as_array().cloned().unwrap_or_default();

  assert_eq!(tags(&releases), vec!["v1.1.0", "v1.2.0"]);
  // v1.0.0 is outside the window but still bounds the v1.1.0 range
  assert_eq!(releases[0]["leadTimeForChanges"], json!(DAY));
  assert_eq!(releases[0]["result"], json!({ "isSuccess": true }));

  Ok(())
}

#[test]
fn test_config_file_and_flag_precedence() -> Result<()> {
  let repo = TestRepo::release_history()?;
  repo.write_file(
    "four-keys.toml",
    r#"[query]
ignore_pattern = "^v1\\.0"
traversal = "in-process"
"#,
  )?;

  let from_file = four_keys_json(&repo.path, &["releases", "--since", "2024-01-01", "--until", "2024-01-10"])?;
  let listed = from_file["releases"].as_array().cloned().unwrap_or_default();
  assert_eq!(tags(&listed), vec!["v1.1.0", "v1.2.0"]);
  assert_eq!(from_file["option"]["traversal"], "in-process");

  // flags win over the file
  let overridden = releases(&repo, &["--ignore-pattern", r"^v1\.2"])?;
  assert_eq!(tags(&overridden), vec!["v1.0.0", "v1.1.0"]);

  Ok(())
}

#[test]
fn test_explicit_config_path() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let dir = tempfile::TempDir::new()?;
  let config = dir.path().join("keys.toml");
  std::fs::write(&config, "[query]\nfix_commit_pattern = \"no commit says this\"\n")?;

  let config = config.display().to_string();
  let releases = releases(&repo, &["--config", config.as_str()])?;
  assert!(releases.iter().all(|r| r["result"]["isSuccess"] == true));

  Ok(())
}
