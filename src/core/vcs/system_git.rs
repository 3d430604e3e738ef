//! System git backend
//!
//! Tags, single-commit lookups and the bounded `git log` used by the native
//! traversal all go through the `git` binary. Every command runs in an
//! isolated environment so user config cannot change the output format.

use crate::core::error::{GitError, KeysError, KeysResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Git backend using the system git binary
#[derive(Debug, Clone)]
pub struct SystemGit {
  /// Path handed to `git -C`
  pub(crate) repo_path: PathBuf,

  /// Absolute git directory (`.git` for worktrees, the repo itself when bare)
  pub(crate) git_dir: PathBuf,
}

/// A remote repository cloned into a temporary directory.
///
/// The clone is deleted when this value is dropped.
pub struct ClonedRepository {
  _dir: TempDir,
  pub git: SystemGit,
}

impl SystemGit {
  /// Open a git repository (worktree or bare)
  pub fn open(path: &Path) -> KeysResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--absolute-git-dir"])
      .output()
      .context("Failed to execute git rev-parse (is git installed and on PATH?)")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") || stderr.contains("cannot change to") {
        return Err(KeysError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(KeysError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let git_dir = String::from_utf8_lossy(&output.stdout).trim().to_string();

    Ok(Self {
      repo_path: path.to_path_buf(),
      git_dir: PathBuf::from(git_dir),
    })
  }

  /// Clone `url` as a bare repository into a fresh temporary directory
  pub fn clone_bare(url: &str) -> KeysResult<ClonedRepository> {
    let dir = tempfile::Builder::new()
      .prefix("four-keys-")
      .tempdir()
      .context("Failed to create temporary directory for clone")?;
    let target = dir.path().join("repo.git");

    tracing::debug!(url = %url, target = %target.display(), "cloning remote repository");

    let output = Command::new("git")
      .args(["clone", "--bare", "--quiet"])
      .arg(url)
      .arg(&target)
      .output()
      .context("Failed to execute git clone (is git installed and on PATH?)")?;

    if !output.status.success() {
      return Err(KeysError::Git(GitError::CloneFailed {
        url: url.to_string(),
        reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    let git = Self::open(&target)?;
    Ok(ClonedRepository { _dir: dir, git })
  }

  /// Absolute git directory, usable by `gix::open`
  pub fn git_dir(&self) -> &Path {
    &self.git_dir
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false");
    cmd.arg("-c").arg("log.showSignature=false");
    cmd.arg("-c").arg("i18n.logOutputEncoding=UTF-8");

    cmd
  }
}
