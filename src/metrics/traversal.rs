//! Commit-range traversal between two releases
//!
//! Both strategies answer the same question for a release commit `C` and the
//! next-older release commit `P`: does any commit in `P..C` look like a fix,
//! and when was the oldest of those commits made? Failures are absorbed
//! into an empty scan so a release with unknown history is still counted.

use crate::core::hooks::QueryHooks;
use crate::core::vcs::{CommitInfo, GixRepository, SystemGit};
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

/// Result of scanning one commit range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeScan {
  pub has_fix_commit: bool,
  pub oldest_commit_time: Option<DateTime<Utc>>,
}

impl RangeScan {
  /// Time from the oldest commit in the range to `release`, never negative
  pub fn lead_time_until(&self, release: DateTime<Utc>) -> TimeDelta {
    self
      .oldest_commit_time
      .map(|oldest| (release - oldest).max(TimeDelta::zero()))
      .unwrap_or_else(TimeDelta::zero)
  }
}

pub trait CommitRangeTraversal {
  /// Scan commits reachable from `current` but not from `prior`
  fn scan(&self, current: &CommitInfo, prior: Option<&CommitInfo>, fix_pattern: &Regex, hooks: &dyn QueryHooks)
  -> RangeScan;
}

/// `git log` based traversal for local working copies
pub struct NativeGitTraversal<'a> {
  git: &'a SystemGit,
}

impl<'a> NativeGitTraversal<'a> {
  pub fn new(git: &'a SystemGit) -> Self {
    Self { git }
  }
}

impl CommitRangeTraversal for NativeGitTraversal<'_> {
  fn scan(
    &self,
    current: &CommitInfo,
    prior: Option<&CommitInfo>,
    fix_pattern: &Regex,
    hooks: &dyn QueryHooks,
  ) -> RangeScan {
    // git log --since is inclusive; start one second after the prior release
    let since = prior.map(|p| p.committed_at() + TimeDelta::seconds(1));

    let lines = match self.git.log_since(since, &current.sha) {
      Ok(lines) => lines,
      Err(e) => {
        hooks.debug(format_args!("git log for {} failed: {}", current.sha, e));
        return RangeScan::default();
      }
    };

    scan_log_lines(&lines, fix_pattern).unwrap_or_else(|line| {
      hooks.debug(format_args!("unparseable git log line for {}: {:?}", current.sha, line));
      RangeScan::default()
    })
  }
}

/// Scan `<unix time> <subject>` lines in date order, newest first.
///
/// Returns the offending line if the oldest (last) line has no timestamp.
fn scan_log_lines(lines: &[String], fix_pattern: &Regex) -> Result<RangeScan, String> {
  let has_fix_commit = lines.iter().any(|line| fix_pattern.is_match(subject_of(line)));

  let Some(last) = lines.last() else {
    return Ok(RangeScan::default());
  };
  let oldest_commit_time = last
    .split_whitespace()
    .next()
    .and_then(|ts| ts.parse::<i64>().ok())
    .and_then(|ts| DateTime::from_timestamp(ts, 0))
    .ok_or_else(|| last.clone())?;

  Ok(RangeScan {
    has_fix_commit,
    oldest_commit_time: Some(oldest_commit_time),
  })
}

fn subject_of(line: &str) -> &str {
  line.split_once(' ').map(|(_, subject)| subject).unwrap_or("")
}

/// gix ancestry walk; needs no `git` binary
pub struct InProcessTraversal<'a> {
  repo: &'a GixRepository,
}

impl<'a> InProcessTraversal<'a> {
  pub fn new(repo: &'a GixRepository) -> Self {
    Self { repo }
  }
}

impl CommitRangeTraversal for InProcessTraversal<'_> {
  fn scan(
    &self,
    current: &CommitInfo,
    prior: Option<&CommitInfo>,
    fix_pattern: &Regex,
    hooks: &dyn QueryHooks,
  ) -> RangeScan {
    let mut scan = RangeScan::default();
    let walked = self.repo.walk_range(&current.sha, prior.map(|p| p.sha.as_str()), |commit| {
      if fix_pattern.is_match(&commit.message) {
        hooks.debug(format_args!("fix commit {}: {}", commit.sha, commit.summary()));
        scan.has_fix_commit = true;
      }
      let time = commit.committed_at();
      if scan.oldest_commit_time.is_none_or(|oldest| time < oldest) {
        scan.oldest_commit_time = Some(time);
      }
    });

    if let Err(e) = walked {
      hooks.debug(format_args!("ancestry walk from {} failed: {:#}", current.sha, e));
      return RangeScan::default();
    }
    scan
  }
}
