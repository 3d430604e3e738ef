pub mod gix_repo;
pub mod system_git;
mod system_git_ops;

pub use gix_repo::GixRepository;
pub use system_git::SystemGit;

use crate::core::error::KeysResult;
use chrono::{DateTime, Utc};

/// Information about a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
  pub sha: String,
  pub message: String,
  /// Committer time, seconds since epoch
  pub timestamp: i64,
}

impl CommitInfo {
  /// Get the first line of the commit message
  pub fn summary(&self) -> &str {
    self.message.lines().next().unwrap_or("")
  }

  /// Committer time as a UTC datetime (epoch for out-of-range values)
  pub fn committed_at(&self) -> DateTime<Utc> {
    DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
  }
}

/// A tag and the object it names (peeled to a commit when annotated)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
  pub name: String,
  pub target: String,
}

/// Read-only repository access needed to resolve releases
pub trait ReleaseRepository {
  /// List all tags in listing order
  fn list_tags(&self) -> KeysResult<Vec<TagRef>>;

  /// Resolve a commit SHA to its metadata
  fn resolve_commit(&self, sha: &str) -> KeysResult<CommitInfo>;
}
