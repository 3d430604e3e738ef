//! Repository location handling

use std::path::PathBuf;

/// Where the repository to analyse lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLocation {
  /// A working copy or git directory on disk
  Local(PathBuf),
  /// Anything git can clone: `https://`, `ssh://`, `file://`, `git@host:path`
  Remote(String),
}

impl RepositoryLocation {
  pub fn parse(value: &str) -> Self {
    if is_remote_url(value) {
      RepositoryLocation::Remote(value.to_string())
    } else {
      RepositoryLocation::Local(PathBuf::from(value))
    }
  }
}

/// Check if a repository argument is a URL rather than a filesystem path
///
/// Returns true for:
/// - Scheme URLs: <https://github.com/user/repo.git>, `ssh://`, `git://`, `file://`
/// - SCP-style SSH: git@github.com:user/repo.git
///
/// Everything else (absolute, relative, bare names, Windows drive paths) is local.
pub fn is_remote_url(value: &str) -> bool {
  if value.contains("://") {
    return true;
  }

  // Windows drive letter (C:\ or C:/) looks like scp syntax
  let bytes = value.as_bytes();
  if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
    return false;
  }

  // user@host:path, with no slash before the colon
  match value.split_once(':') {
    Some((host, _)) => host.contains('@') && !host.contains('/'),
    None => false,
  }
}
