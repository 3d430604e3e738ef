//! In-process repository access with gix (gitoxide)
//!
//! Tags, commit lookups and the ancestry walk all run without the `git`
//! binary, so the in-process traversal works on machines without git.

use super::{CommitInfo, ReleaseRepository, TagRef};
use crate::core::error::KeysResult;
use anyhow::{Context, Result, anyhow};
use gix::revision::walk::Sorting;
use gix::traverse::commit::simple::CommitTimeOrder;
use gix::{ObjectId, Repository, ThreadSafeRepository};
use std::path::Path;

/// Commits are decoded twice per walk (once by the walk, once for the message)
const OBJECT_CACHE_BYTES: usize = 4 * 1024 * 1024;

/// Read-only gix handle on a repository, shareable across threads
pub struct GixRepository {
  repo: ThreadSafeRepository,
}

impl GixRepository {
  /// Open the repository containing `path` (worktree, subdirectory or git directory)
  pub fn open(path: &Path) -> Result<Self> {
    let repo = ThreadSafeRepository::discover(path)
      .with_context(|| format!("Failed to open git repository at {}", path.display()))?;
    Ok(Self { repo })
  }

  fn local(&self) -> Repository {
    let mut repo = self.repo.to_thread_local();
    repo.object_cache_size_if_unset(OBJECT_CACHE_BYTES);
    repo
  }

  /// Visit commits reachable from `root` but not from `exclude`, newest first.
  ///
  /// Without `exclude` the walk covers every ancestor of `root`. Hidden
  /// history is only painted as far as the walk needs it.
  pub fn walk_range(&self, root: &str, exclude: Option<&str>, mut visit: impl FnMut(CommitInfo)) -> Result<()> {
    let root = parse_id(root)?;
    let hidden = exclude.map(parse_id).transpose()?;

    let repo = self.local();
    let walk = repo
      .rev_walk([root])
      .with_hidden(hidden)
      .sorting(Sorting::ByCommitTime(CommitTimeOrder::NewestFirst))
      .all()
      .with_context(|| format!("Failed to start history walk from {}", root))?;

    for info in walk {
      let info = info.with_context(|| format!("History walk from {} failed", root))?;
      visit(load_commit(&repo, info.id)?);
    }
    Ok(())
  }

  /// Tags sorted by name, annotated tags peeled to the object they point at
  pub fn tag_refs(&self) -> Result<Vec<TagRef>> {
    let repo = self.local();
    let references = repo.references().context("Failed to read references")?;

    let mut tags = Vec::new();
    for reference in references.tags().context("Failed to list tags")? {
      let mut reference = reference.map_err(|e| anyhow!("Failed to read tag reference: {}", e))?;
      let name = reference.name().shorten().to_string();
      match reference.peel_to_id() {
        Ok(target) => tags.push(TagRef {
          name,
          target: target.to_string(),
        }),
        Err(e) => tracing::debug!(tag = %name, error = %e, "skipping tag that does not peel"),
      }
    }

    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
  }

  /// Commit metadata for a single SHA
  pub fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
    load_commit(&self.local(), parse_id(sha)?)
  }
}

impl ReleaseRepository for GixRepository {
  fn list_tags(&self) -> KeysResult<Vec<TagRef>> {
    Ok(self.tag_refs()?)
  }

  fn resolve_commit(&self, sha: &str) -> KeysResult<CommitInfo> {
    Ok(self.get_commit(sha)?)
  }
}

fn parse_id(sha: &str) -> Result<ObjectId> {
  ObjectId::from_hex(sha.as_bytes()).with_context(|| format!("Invalid commit SHA: {}", sha))
}

fn load_commit(repo: &Repository, id: ObjectId) -> Result<CommitInfo> {
  let commit_obj = repo
    .find_object(id)
    .with_context(|| format!("Commit not found: {}", id))?
    .try_into_commit()?;
  let commit = commit_obj.decode()?;

  // gix keeps the raw "<seconds> <offset>" signature time
  let committer = commit.committer();
  let timestamp = std::str::from_utf8(committer.time.as_ref())
    .ok()
    .and_then(|s| s.split_whitespace().next())
    .and_then(|s| s.parse::<i64>().ok())
    .with_context(|| format!("Invalid committer time on {}", id))?;

  Ok(CommitInfo {
    sha: id.to_string(),
    message: commit.message.to_string(),
    timestamp,
  })
}
