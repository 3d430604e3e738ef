//! JSON shapes printed by the commands

use crate::core::config::{QueryOption, TraversalKind};
use crate::core::error::KeysResult;
use crate::metrics::{Metrics, Release};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::io::{self, Write};

/// The options a result was computed with
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSummary {
  pub repository: String,
  pub since: DateTime<Utc>,
  pub until: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ignore_pattern: Option<String>,
  pub fix_commit_pattern: String,
  pub traversal: TraversalKind,
}

impl OptionSummary {
  pub fn new(repository: &str, option: &QueryOption) -> Self {
    Self {
      repository: repository.to_string(),
      since: option.window.since,
      until: option.window.until,
      ignore_pattern: option.ignore_pattern.as_ref().map(|p| p.as_str().to_string()),
      fix_commit_pattern: option.fix_commit_pattern.as_str().to_string(),
      traversal: option.traversal,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
  Days,
  Hours,
  Minutes,
  Seconds,
}

impl TimeUnit {
  fn seconds(self) -> i64 {
    match self {
      TimeUnit::Days => 86_400,
      TimeUnit::Hours => 3_600,
      TimeUnit::Minutes => 60,
      TimeUnit::Seconds => 1,
    }
  }
}

/// A duration in the largest unit it fills at least once
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationWithTimeUnit {
  pub value: f64,
  pub unit: TimeUnit,
}

impl From<TimeDelta> for DurationWithTimeUnit {
  fn from(duration: TimeDelta) -> Self {
    let seconds = duration.num_milliseconds() as f64 / 1000.0;
    let unit = [TimeUnit::Days, TimeUnit::Hours, TimeUnit::Minutes]
      .into_iter()
      .find(|unit| seconds.abs() >= unit.seconds() as f64)
      .unwrap_or(TimeUnit::Seconds);
    Self {
      value: seconds / unit.seconds() as f64,
      unit,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOutput {
  pub option: OptionSummary,
  pub deployment_frequency: f64,
  pub lead_time_for_changes: DurationWithTimeUnit,
  pub time_to_restore_services: DurationWithTimeUnit,
  pub change_failure_rate: f64,
}

impl MetricsOutput {
  pub fn new(option: OptionSummary, metrics: &Metrics) -> Self {
    Self {
      option,
      deployment_frequency: metrics.deployment_frequency,
      lead_time_for_changes: metrics.lead_time_for_changes.into(),
      time_to_restore_services: metrics.time_to_restore_services.into(),
      change_failure_rate: metrics.change_failure_rate,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseOutput {
  pub tag: String,
  pub date: DateTime<Utc>,
  /// Seconds
  pub lead_time_for_changes: i64,
  pub result: ReleaseResultOutput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResultOutput {
  pub is_success: bool,
  /// Seconds
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_to_restore: Option<i64>,
}

impl From<&Release> for ReleaseOutput {
  fn from(release: &Release) -> Self {
    Self {
      tag: release.tag.clone(),
      date: release.date,
      lead_time_for_changes: release.lead_time_for_changes.num_seconds(),
      result: ReleaseResultOutput {
        is_success: release.result.is_success,
        time_to_restore: release.result.time_to_restore.map(|d| d.num_seconds()),
      },
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleasesOutput {
  pub option: OptionSummary,
  pub releases: Vec<ReleaseOutput>,
}

/// Print `value` as JSON on stdout
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> KeysResult<()> {
  write_json(&mut io::stdout().lock(), value, pretty)
}

/// A reader that closed the pipe early (`four-keys | head`) is not an error
fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> KeysResult<()> {
  let json = if pretty {
    serde_json::to_string_pretty(value)?
  } else {
    serde_json::to_string(value)?
  };
  match writeln!(out, "{}", json).and_then(|()| out.flush()) {
    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
      tracing::debug!("stdout closed before output was written");
      Ok(())
    }
    result => Ok(result?),
  }
}
