//! Query configuration
//!
//! Settings come from an optional `four-keys.toml` and from command-line
//! flags (flags win). Everything is validated here, before any git traversal
//! starts, and frozen into a [`QueryOption`].

use crate::core::error::{ConfigError, KeysError, KeysResult, ResultExt};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Commit messages containing this are fixes unless configured otherwise
pub const DEFAULT_FIX_COMMIT_PATTERN: &str = "hotfix";

/// Window length used when `--since` is not given
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// How commit ranges between releases are scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalKind {
  /// `git log` subprocess per release (local repositories)
  Native,
  /// gix ancestry walk (cloned or in-memory repositories)
  InProcess,
}

/// Configuration file contents
/// Searched in order: four-keys.toml, .four-keys.toml, .config/four-keys.toml
///
/// ```toml
/// [query]
/// ignore_pattern = "-rc\\d*$"
/// fix_commit_pattern = "(?i)hotfix|revert"
/// traversal = "native"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FourKeysConfig {
  #[serde(default)]
  pub query: QueryConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
  #[serde(default)]
  pub since: Option<String>,
  #[serde(default)]
  pub until: Option<String>,
  #[serde(default)]
  pub ignore_pattern: Option<String>,
  #[serde(default)]
  pub fix_commit_pattern: Option<String>,
  #[serde(default)]
  pub traversal: Option<TraversalKind>,
}

impl FourKeysConfig {
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("four-keys.toml"),
      path.join(".four-keys.toml"),
      path.join(".config").join("four-keys.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the first candidate under `path`, if any
  pub fn discover(path: &Path) -> KeysResult<Option<Self>> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load(&config_path).map(Some),
      None => Ok(None),
    }
  }

  /// Load config from an explicit file
  pub fn load(config_path: &Path) -> KeysResult<Self> {
    if !config_path.exists() {
      return Err(KeysError::Config(ConfigError::NotFound {
        path: config_path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: FourKeysConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    Ok(config)
  }
}

/// Half-open time window `[since, until)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
  pub since: DateTime<Utc>,
  pub until: DateTime<Utc>,
}

impl TimeWindow {
  pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> KeysResult<Self> {
    if since > until {
      return Err(KeysError::Config(ConfigError::InvertedWindow {
        since: since.to_rfc3339(),
        until: until.to_rfc3339(),
      }));
    }
    Ok(Self { since, until })
  }

  pub fn contains(&self, time: DateTime<Utc>) -> bool {
    self.since <= time && time < self.until
  }

  /// Whole days covered by the window
  pub fn whole_days(&self) -> i64 {
    (self.until - self.since).num_days()
  }
}

/// Which end of the window a bound is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
  Since,
  Until,
}

impl Bound {
  fn field(self) -> &'static str {
    match self {
      Bound::Since => "since",
      Bound::Until => "until",
    }
  }
}

/// Parse a window bound.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare `YYYY-MM-DD`.
/// A bare date as `until` covers that whole day.
pub fn parse_bound(bound: Bound, value: &str) -> KeysResult<DateTime<Utc>> {
  let value = value.trim();
  let invalid = |reason: String| {
    KeysError::Config(ConfigError::InvalidBound {
      field: bound.field(),
      value: value.to_string(),
      reason,
    })
  };

  if let Ok(time) = DateTime::parse_from_rfc3339(value) {
    return Ok(time.with_timezone(&Utc));
  }
  if let Ok(time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
    return Ok(time.and_utc());
  }

  let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| invalid(e.to_string()))?;
  let date = match bound {
    Bound::Since => date,
    Bound::Until => date
      .checked_add_days(Days::new(1))
      .ok_or_else(|| invalid("date out of range".to_string()))?,
  };
  Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

fn compile_pattern(field: &'static str, pattern: &str) -> KeysResult<Regex> {
  Regex::new(pattern).map_err(|e| {
    KeysError::Config(ConfigError::InvalidPattern {
      field,
      pattern: pattern.to_string(),
      reason: e.to_string(),
    })
  })
}

/// Unvalidated settings, merged from flags and the config file
#[derive(Debug, Clone, Default)]
pub struct QuerySettings {
  pub since: Option<String>,
  pub until: Option<String>,
  pub ignore_pattern: Option<String>,
  pub fix_commit_pattern: Option<String>,
  pub traversal: Option<TraversalKind>,
}

impl QuerySettings {
  /// Fill unset fields from the config file
  pub fn with_file_defaults(self, file: &QueryConfig) -> Self {
    Self {
      since: self.since.or_else(|| file.since.clone()),
      until: self.until.or_else(|| file.until.clone()),
      ignore_pattern: self.ignore_pattern.or_else(|| file.ignore_pattern.clone()),
      fix_commit_pattern: self.fix_commit_pattern.or_else(|| file.fix_commit_pattern.clone()),
      traversal: self.traversal.or(file.traversal),
    }
  }

  /// Validate into an immutable [`QueryOption`].
  ///
  /// `now` anchors the default window; `default_traversal` applies when no
  /// backend was chosen explicitly.
  pub fn resolve(self, now: DateTime<Utc>, default_traversal: TraversalKind) -> KeysResult<QueryOption> {
    let until = match &self.until {
      Some(value) => parse_bound(Bound::Until, value)?,
      None => now,
    };
    let since = match &self.since {
      Some(value) => parse_bound(Bound::Since, value)?,
      None => until - TimeDelta::days(DEFAULT_WINDOW_DAYS),
    };
    let window = TimeWindow::new(since, until)?;

    let ignore_pattern = self
      .ignore_pattern
      .as_deref()
      .filter(|p| !p.is_empty())
      .map(|p| compile_pattern("ignore-pattern", p))
      .transpose()?;
    let fix_commit_pattern = match self.fix_commit_pattern.as_deref().filter(|p| !p.is_empty()) {
      Some(p) => compile_pattern("fix-commit-pattern", p)?,
      None => compile_pattern("fix-commit-pattern", &regex::escape(DEFAULT_FIX_COMMIT_PATTERN))?,
    };

    Ok(QueryOption {
      window,
      ignore_pattern,
      fix_commit_pattern,
      traversal: self.traversal.unwrap_or(default_traversal),
    })
  }
}

/// Validated, immutable options for one query
#[derive(Debug, Clone)]
pub struct QueryOption {
  pub window: TimeWindow,
  pub ignore_pattern: Option<Regex>,
  pub fix_commit_pattern: Regex,
  pub traversal: TraversalKind,
}

impl QueryOption {
  pub fn should_ignore(&self, tag: &str) -> bool {
    self.ignore_pattern.as_ref().is_some_and(|p| p.is_match(tag))
  }
}
