//! Invalid input is reported before any git work, with the offending flag named

use crate::helpers::*;
use anyhow::Result;

fn failing(repo: &TestRepo, args: &[&str]) -> Result<(i32, String)> {
  let output = four_keys(&repo.path, args)?;
  assert!(!output.status.success(), "four-keys {} unexpectedly succeeded", args.join(" "));
  Ok((
    output.status.code().unwrap_or_default(),
    String::from_utf8_lossy(&output.stderr).to_string(),
  ))
}

#[test]
fn test_invalid_since() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let (code, stderr) = failing(&repo, &["--since", "yesterday-ish"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("--since"), "{stderr}");
  assert!(stderr.contains("yesterday-ish"), "{stderr}");

  Ok(())
}

#[test]
fn test_invalid_until() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let (code, stderr) = failing(&repo, &["releases", "--until", "2024-13-45"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("--until"), "{stderr}");

  Ok(())
}

#[test]
fn test_inverted_window() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let (code, stderr) = failing(&repo, &["--since", "2024-02-01", "--until", "2024-01-01"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("since") && stderr.contains("until"), "{stderr}");

  Ok(())
}

#[test]
fn test_invalid_pattern() -> Result<()> {
  let repo = TestRepo::release_history()?;
  let (code, stderr) = failing(&repo, &["--ignore-pattern", "(unclosed"])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("--ignore-pattern"), "{stderr}");

  Ok(())
}

#[test]
fn test_not_a_repository() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let output = four_keys(dir.path(), &["--since", "2024-01-01"])?;

  assert_eq!(output.status.code(), Some(2));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("not found"), "{stderr}");

  Ok(())
}

#[test]
fn test_malformed_config_file() -> Result<()> {
  let repo = TestRepo::release_history()?;
  repo.write_file("four-keys.toml", "[query\nsince = ")?;
  let (code, stderr) = failing(&repo, &[])?;

  assert_eq!(code, 1);
  assert!(stderr.contains("four-keys.toml"), "{stderr}");

  Ok(())
}
