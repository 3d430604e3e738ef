//! Release classification
//!
//! Releases are visited newest first. A release is a failure when a newer
//! release shipped a fix commit, i.e. the fix landed in the range right after
//! it. The success that ends a failure streak records how long the service
//! was degraded: its own date minus the date of the oldest failure in the
//! streak.

use crate::core::config::QueryOption;
use crate::core::hooks::{QueryHooks, timed};
use crate::core::vcs::ReleaseRepository;
use crate::metrics::sources::resolve_release_sources;
use crate::metrics::traversal::{CommitRangeTraversal, RangeScan};
use chrono::{DateTime, TimeDelta, Utc};

/// One deployment and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
  pub tag: String,
  pub date: DateTime<Utc>,
  pub lead_time_for_changes: TimeDelta,
  pub result: ReleaseResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseResult {
  pub is_success: bool,
  /// Set only on a success that restores service after a failure streak
  pub time_to_restore: Option<TimeDelta>,
}

/// Fold state while visiting releases newest first
#[derive(Debug, Clone, Default)]
pub struct Classification {
  /// Emitted releases, newest first
  releases: Vec<Release>,
  /// Index of the most recent success, which owns the restore time of any
  /// failures emitted after it
  pending_restore: Option<usize>,
  /// The previously emitted release's range contained a fix commit
  restored_by_newer: bool,
}

impl Classification {
  /// Classify the next-older release
  pub fn step(mut self, tag: String, date: DateTime<Utc>, scan: RangeScan) -> Self {
    let is_success = !self.restored_by_newer;

    if is_success {
      self.pending_restore = Some(self.releases.len());
    } else if let Some(pending) = self.pending_restore {
      // each older failure in the streak pushes the restore time back
      let restored = &mut self.releases[pending];
      restored.result.time_to_restore = Some(restored.date - date);
    }

    self.restored_by_newer = scan.has_fix_commit;
    self.releases.push(Release {
      tag,
      date,
      lead_time_for_changes: scan.lead_time_until(date),
      result: ReleaseResult {
        is_success,
        time_to_restore: None,
      },
    });
    self
  }

  /// Finished releases, oldest first
  pub fn into_releases(self) -> Vec<Release> {
    let mut releases = self.releases;
    releases.reverse();
    releases
  }
}

/// List and classify every release inside the query window, oldest first.
///
/// Never fails: a repository whose tags cannot be listed yields no releases,
/// and releases whose commit range cannot be scanned count as successes with
/// zero lead time.
pub fn query_releases<R>(
  repo: &R,
  traversal: &dyn CommitRangeTraversal,
  option: &QueryOption,
  hooks: &dyn QueryHooks,
) -> Vec<Release>
where
  R: ReleaseRepository + Sync,
{
  timed(hooks, "query_releases", || {
    let tags = timed(hooks, "query_tags", || repo.list_tags()).unwrap_or_else(|e| {
      tracing::warn!("could not list tags: {}", e);
      Vec::new()
    });
    hooks.debug(format_args!("tags: {}", tags.len()));

    let sources = resolve_release_sources(repo, tags, hooks);
    hooks.debug(format_args!("release sources: {}", sources.len()));

    let classification = sources
      .iter()
      .enumerate()
      .fold(Classification::default(), |acc, (i, source)| {
        if option.should_ignore(&source.tag) {
          hooks.debug(format_args!("ignoring {}", source.tag));
          return acc;
        }
        let date = source.commit.committed_at();
        if !option.window.contains(date) {
          return acc;
        }

        // the next-older source bounds the range even when it is itself filtered out
        let prior = sources.get(i + 1).map(|s| &s.commit);
        let key = format!("source[{}]({}) release metrics", i, source.tag);
        let scan = timed(hooks, &key, || {
          traversal.scan(&source.commit, prior, &option.fix_commit_pattern, hooks)
        });
        acc.step(source.tag.clone(), date, scan)
      });

    classification.into_releases()
  })
}
