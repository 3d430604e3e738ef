//! Release-facing operations for SystemGit (tags, commit lookup, bounded log)

use super::system_git::SystemGit;
use super::{CommitInfo, ReleaseRepository, TagRef};
use crate::core::error::{GitError, KeysError, KeysResult, ResultExt};
use chrono::{DateTime, Utc};

impl SystemGit {
  /// List tags with their targets, peeling annotated tags
  ///
  /// Uses a single `git for-each-ref` call; output is ordered by refname.
  pub fn list_tag_refs(&self) -> KeysResult<Vec<TagRef>> {
    let output = self
      .git_cmd()
      .args([
        "for-each-ref",
        "--format=%(refname:short)%00%(objectname)%00%(*objectname)",
        "refs/tags",
      ])
      .output()
      .context("Failed to run git for-each-ref")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(KeysError::Git(GitError::CommandFailed {
        command: "git for-each-ref refs/tags".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(parse_tag_refs(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Get commit metadata for a single SHA (tag objects are peeled)
  pub fn get_commit(&self, sha: &str) -> KeysResult<CommitInfo> {
    // %H (hash) %ct (committer time) %B (raw body)
    let format = "%H%n%ct%n%B";

    let output = self
      .git_cmd()
      .args(["log", "-1", &format!("--format={}", format), &format!("{}^{{commit}}", sha), "--"])
      .output()
      .context("Failed to get commit info")?;

    if !output.status.success() {
      return Err(KeysError::Git(GitError::CommitNotFound { sha: sha.to_string() }));
    }

    parse_commit_output(&output.stdout)
  }

  /// Run `git log` from `root`, newest first in date order
  ///
  /// Lines have the form `<committer unix time> <subject>`. With `since`,
  /// only commits committed at or after that instant are listed.
  pub fn log_since(&self, since: Option<DateTime<Utc>>, root: &str) -> KeysResult<Vec<String>> {
    let mut cmd = self.git_cmd();
    cmd.args(["log", "--format=%ct %s", "--date-order"]);
    if let Some(since) = since {
      // Same shape as `git log --date=iso` output, which git always parses back
      cmd.arg(format!("--since={}", since.format("%Y-%m-%d %H:%M:%S +0000")));
    }
    cmd.arg(root).arg("--");

    let output = cmd.output().context("Failed to run git log")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(KeysError::Git(GitError::CommandFailed {
        command: format!("git log {}", root),
        stderr: stderr.to_string(),
      }));
    }

    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect(),
    )
  }
}

impl ReleaseRepository for SystemGit {
  fn list_tags(&self) -> KeysResult<Vec<TagRef>> {
    self.list_tag_refs()
  }

  fn resolve_commit(&self, sha: &str) -> KeysResult<CommitInfo> {
    self.get_commit(sha)
  }
}

/// Parse `for-each-ref` output of `name NUL object NUL peeled-object` lines
fn parse_tag_refs(output: &str) -> Vec<TagRef> {
  output
    .lines()
    .filter_map(|line| {
      let mut fields = line.split('\0');
      let name = fields.next()?.trim();
      let object = fields.next()?.trim();
      let peeled = fields.next().unwrap_or("").trim();
      if name.is_empty() || object.is_empty() {
        return None;
      }
      let target = if peeled.is_empty() { object } else { peeled };
      Some(TagRef {
        name: name.to_string(),
        target: target.to_string(),
      })
    })
    .collect()
}

/// Parse git log output into CommitInfo
///
/// Format is %H%n%ct%n%B: hash, committer time, body
fn parse_commit_output(data: &[u8]) -> KeysResult<CommitInfo> {
  let output = String::from_utf8_lossy(data);
  let mut lines = output.lines();

  let sha = lines.next().ok_or_else(|| KeysError::message("Missing commit SHA"))?.to_string();
  let timestamp = lines
    .next()
    .and_then(|s| s.trim().parse::<i64>().ok())
    .ok_or_else(|| KeysError::message("Missing/invalid committer timestamp"))?;

  // Rest is commit message
  let message: Vec<&str> = lines.collect();
  let message = message.join("\n").trim().to_string();

  Ok(CommitInfo { sha, message, timestamp })
}
