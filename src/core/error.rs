//! Error types for four-keys with contextual messages and exit codes
//!
//! Only the boundary of a query can fail: opening the repository and parsing
//! the configuration. The release classifier and the aggregator are total, so
//! nothing in `metrics` returns these errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for four-keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, I/O)
  System = 2,
}

impl ExitCode {
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for four-keys
#[derive(Debug)]
pub enum KeysError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error message
  Message(String),

  /// An error annotated with the operation that failed
  Context { context: String, source: Box<KeysError> },
}

impl KeysError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    KeysError::Message(msg.into())
  }

  /// Add context to an existing error; exit code and help come from the wrapped error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    KeysError::Context {
      context: ctx.into(),
      source: Box::new(self),
    }
  }

  pub fn exit_code(&self) -> ExitCode {
    match self {
      KeysError::Config(_) => ExitCode::User,
      KeysError::Git(_) => ExitCode::System,
      KeysError::Io(_) => ExitCode::System,
      KeysError::Message(_) => ExitCode::User,
      KeysError::Context { source, .. } => source.exit_code(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      KeysError::Config(e) => e.help_message(),
      KeysError::Git(e) => e.help_message(),
      KeysError::Context { source, .. } => source.help_message(),
      KeysError::Io(_) | KeysError::Message(_) => None,
    }
  }
}

impl fmt::Display for KeysError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      KeysError::Config(e) => write!(f, "{}", e),
      KeysError::Git(e) => write!(f, "{}", e),
      KeysError::Io(e) => write!(f, "I/O error: {}", e),
      KeysError::Message(message) => write!(f, "{}", message),
      KeysError::Context { context, source } => write!(f, "{}: {}", context, source),
    }
  }
}

impl std::error::Error for KeysError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      KeysError::Io(e) => Some(e),
      KeysError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for KeysError {
  fn from(err: io::Error) -> Self {
    KeysError::Io(err)
  }
}

impl From<serde_json::Error> for KeysError {
  fn from(err: serde_json::Error) -> Self {
    KeysError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for KeysError {
  fn from(err: toml_edit::de::Error) -> Self {
    KeysError::message(format!("TOML deserialization error: {}", err))
  }
}

/// The gix backend reports through anyhow
impl From<anyhow::Error> for KeysError {
  fn from(err: anyhow::Error) -> Self {
    KeysError::message(format!("{:#}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A window bound (`since` / `until`) could not be parsed
  InvalidBound {
    field: &'static str,
    value: String,
    reason: String,
  },

  /// `since` is later than `until`
  InvertedWindow { since: String, until: String },

  /// A regex option did not compile
  InvalidPattern {
    field: &'static str,
    pattern: String,
    reason: String,
  },

  /// Explicitly requested config file does not exist
  NotFound { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidBound { .. } => {
        Some("Use a date like 2024-01-31 or an RFC 3339 timestamp like 2024-01-31T12:00:00Z.".to_string())
      }
      ConfigError::InvertedWindow { .. } => Some("--since must not be later than --until.".to_string()),
      ConfigError::InvalidPattern { .. } => Some("Patterns use Rust regex syntax (https://docs.rs/regex).".to_string()),
      ConfigError::NotFound { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidBound { field, value, reason } => {
        write!(f, "Invalid --{} value '{}': {}", field, value, reason)
      }
      ConfigError::InvertedWindow { since, until } => {
        write!(f, "Invalid time window: since ({}) is after until ({})", since, until)
      }
      ConfigError::InvalidPattern { field, pattern, reason } => {
        write!(f, "Invalid --{} '{}': {}", field, pattern, reason)
      }
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Commit not found
  CommitNotFound { sha: String },

  /// Cloning a remote repository failed
  CloneFailed { url: String, reason: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run four-keys inside a git repository or pass --repository (checked: {})",
        path.display()
      )),
      GitError::CloneFailed { .. } => Some("Check the URL and your network access to the remote.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::CommitNotFound { sha } => {
        write!(f, "Commit not found: {}", sha)
      }
      GitError::CloneFailed { url, reason } => {
        write!(f, "Failed to clone {}: {}", url, reason)
      }
    }
  }
}

/// Result type alias for four-keys
pub type KeysResult<T> = Result<T, KeysError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> KeysResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> KeysResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<KeysError>,
{
  fn context(self, ctx: impl Into<String>) -> KeysResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> KeysResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with help text
pub fn print_error(error: &KeysError) {
  eprintln!("\nerror: {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("help: {}\n", help);
  }
}
