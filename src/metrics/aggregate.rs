//! The four key metrics over a list of classified releases

use crate::core::config::TimeWindow;
use crate::metrics::classifier::Release;
use chrono::TimeDelta;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
  /// Releases per whole day of the window
  pub deployment_frequency: f64,
  pub lead_time_for_changes: TimeDelta,
  pub time_to_restore_services: TimeDelta,
  /// Failed releases over all releases, in `[0, 1]`
  pub change_failure_rate: f64,
}

/// Aggregate `releases` (oldest first) over `window`
pub fn compute_metrics(releases: &[Release], window: &TimeWindow) -> Metrics {
  Metrics {
    deployment_frequency: deployment_frequency(releases, window),
    lead_time_for_changes: mean_lead_time(releases),
    time_to_restore_services: mean_time_to_restore(releases),
    change_failure_rate: change_failure_rate(releases),
  }
}

/// Zero for windows shorter than a day
pub fn deployment_frequency(releases: &[Release], window: &TimeWindow) -> f64 {
  let days = window.whole_days();
  if days <= 0 {
    return 0.0;
  }
  releases.len() as f64 / days as f64
}

pub fn mean_lead_time(releases: &[Release]) -> TimeDelta {
  mean(releases.iter().map(|r| r.lead_time_for_changes))
}

/// Mean gap between the first failure of each streak and the success that
/// ends it. Streaks that never end contribute nothing.
pub fn mean_time_to_restore(releases: &[Release]) -> TimeDelta {
  let mut first_failure = None;
  let mut restores = Vec::new();

  for release in releases {
    match (release.result.is_success, first_failure) {
      (false, None) => first_failure = Some(release.date),
      (true, Some(failed_at)) => {
        restores.push(release.date - failed_at);
        first_failure = None;
      }
      _ => {}
    }
  }

  mean(restores.into_iter())
}

pub fn change_failure_rate(releases: &[Release]) -> f64 {
  if releases.is_empty() {
    return 0.0;
  }
  let failures = releases.iter().filter(|r| !r.result.is_success).count();
  failures as f64 / releases.len() as f64
}

fn mean(durations: impl Iterator<Item = TimeDelta>) -> TimeDelta {
  let (sum, count) = durations.fold((TimeDelta::zero(), 0i64), |(sum, count), d| (sum + d, count + 1));
  if count == 0 {
    return TimeDelta::zero();
  }
  TimeDelta::milliseconds(sum.num_milliseconds() / count)
}
