//! Release source resolution: tags to commits, newest first

use crate::core::hooks::QueryHooks;
use crate::core::vcs::{CommitInfo, ReleaseRepository, TagRef};
use rayon::prelude::*;

/// A tag paired with the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
  pub tag: String,
  pub commit: CommitInfo,
}

/// Resolve every tag to its commit and order the result by committer time,
/// newest first.
///
/// Tags whose target cannot be resolved (e.g. a tag on a tree or blob) are
/// dropped. Tags sharing a commit timestamp keep their listing order.
pub fn resolve_release_sources<R>(repo: &R, tags: Vec<TagRef>, hooks: &dyn QueryHooks) -> Vec<ReleaseSource>
where
  R: ReleaseRepository + Sync,
{
  // par_iter + collect keeps listing order
  let resolved: Vec<_> = tags
    .into_par_iter()
    .map(|tag| {
      let commit = repo.resolve_commit(&tag.target);
      (tag, commit)
    })
    .collect();

  let mut sources: Vec<ReleaseSource> = resolved
    .into_iter()
    .filter_map(|(tag, commit)| match commit {
      Ok(commit) => Some(ReleaseSource { tag: tag.name, commit }),
      Err(e) => {
        hooks.debug(format_args!("skipping tag {}: {}", tag.name, e));
        None
      }
    })
    .collect();

  // stable, so equal timestamps stay in listing order
  sources.sort_by(|a, b| b.commit.timestamp.cmp(&a.commit.timestamp));
  sources
}
