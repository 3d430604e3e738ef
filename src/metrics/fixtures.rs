//! In-memory repository and traversal used by the metrics tests

use crate::core::error::{GitError, KeysError, KeysResult};
use crate::core::hooks::QueryHooks;
use crate::core::vcs::{CommitInfo, ReleaseRepository, TagRef};
use crate::metrics::traversal::{CommitRangeTraversal, RangeScan};
use chrono::DateTime;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

/// Tags listed in insertion order; a tag without a timestamp does not resolve
#[derive(Default)]
pub struct FakeRepo {
  tags: Vec<TagRef>,
  commits: HashMap<String, i64>,
  pub fail_listing: bool,
}

impl FakeRepo {
  pub fn new(entries: &[(&str, &str, Option<i64>)]) -> Self {
    let mut repo = Self::default();
    for (name, sha, timestamp) in entries {
      repo.tags.push(TagRef {
        name: name.to_string(),
        target: sha.to_string(),
      });
      if let Some(ts) = timestamp {
        repo.commits.insert(sha.to_string(), *ts);
      }
    }
    repo
  }

  /// One tag per commit, with the tag name doubling as the SHA
  pub fn tagged(entries: &[(&str, i64)]) -> Self {
    let entries: Vec<_> = entries.iter().map(|(name, ts)| (*name, *name, Some(*ts))).collect();
    Self::new(&entries)
  }

  pub fn tags(&self) -> Vec<TagRef> {
    self.tags.clone()
  }
}

impl ReleaseRepository for FakeRepo {
  fn list_tags(&self) -> KeysResult<Vec<TagRef>> {
    if self.fail_listing {
      return Err(KeysError::message("for-each-ref exploded"));
    }
    Ok(self.tags.clone())
  }

  fn resolve_commit(&self, sha: &str) -> KeysResult<CommitInfo> {
    let timestamp = self
      .commits
      .get(sha)
      .copied()
      .ok_or_else(|| KeysError::Git(GitError::CommitNotFound { sha: sha.to_string() }))?;
    Ok(CommitInfo {
      sha: sha.to_string(),
      message: format!("release {sha}"),
      timestamp,
    })
  }
}

/// Canned range scans keyed by the release commit SHA
#[derive(Default)]
pub struct FakeTraversal {
  scans: HashMap<String, RangeScan>,
  /// `(current, prior)` SHAs in call order
  pub calls: RefCell<Vec<(String, Option<String>)>>,
}

impl FakeTraversal {
  pub fn with(mut self, sha: &str, has_fix_commit: bool, oldest: Option<i64>) -> Self {
    self.scans.insert(
      sha.to_string(),
      RangeScan {
        has_fix_commit,
        oldest_commit_time: oldest.and_then(|ts| DateTime::from_timestamp(ts, 0)),
      },
    );
    self
  }
}

impl CommitRangeTraversal for FakeTraversal {
  fn scan(&self, current: &CommitInfo, prior: Option<&CommitInfo>, _: &Regex, _: &dyn QueryHooks) -> RangeScan {
    self
      .calls
      .borrow_mut()
      .push((current.sha.clone(), prior.map(|p| p.sha.clone())));
    self.scans.get(&current.sha).copied().unwrap_or_default()
  }
}
