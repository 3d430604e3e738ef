//! Shared front half of every command: options, repository, traversal

use crate::core::config::{FourKeysConfig, QueryOption, QuerySettings, TraversalKind};
use crate::core::error::{GitError, KeysError, KeysResult};
use crate::core::hooks::QueryHooks;
use crate::core::vcs::{GixRepository, SystemGit};
use crate::metrics::{InProcessTraversal, NativeGitTraversal, Release, query_releases};
use crate::utils::RepositoryLocation;
use chrono::Utc;
use std::env;
use std::path::{Path, PathBuf};

/// Everything a command needs to run a query
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
  /// Local path or remote URL; the current directory when unset
  pub repository: Option<String>,
  /// Explicit config file, bypassing discovery
  pub config: Option<PathBuf>,
  pub settings: QuerySettings,
}

/// Releases of one query and the options that produced them
pub struct QueryOutcome {
  pub repository: String,
  pub option: QueryOption,
  pub releases: Vec<Release>,
}

/// Validate options, open (or clone) the repository and classify its releases
pub fn run_query(request: QueryRequest, hooks: &dyn QueryHooks) -> KeysResult<QueryOutcome> {
  let repository = request.repository.unwrap_or_else(|| ".".to_string());
  let location = RepositoryLocation::parse(&repository);

  let file = match &request.config {
    Some(path) => FourKeysConfig::load(path)?,
    None => {
      let search_root = match &location {
        RepositoryLocation::Local(path) => path.clone(),
        RepositoryLocation::Remote(_) => env::current_dir()?,
      };
      FourKeysConfig::discover(&search_root)?.unwrap_or_default()
    }
  };

  let default_traversal = match location {
    RepositoryLocation::Local(_) => TraversalKind::Native,
    RepositoryLocation::Remote(_) => TraversalKind::InProcess,
  };

  // all validation happens before any git work
  let option = request
    .settings
    .with_file_defaults(&file.query)
    .resolve(Utc::now(), default_traversal)?;
  tracing::debug!(?option, "resolved query options");

  let releases = match &location {
    RepositoryLocation::Local(path) => classify(path, &option, hooks)?,
    RepositoryLocation::Remote(url) => {
      let cloned = SystemGit::clone_bare(url)?;
      classify(cloned.git.git_dir(), &option, hooks)?
    }
  };

  Ok(QueryOutcome {
    repository,
    option,
    releases,
  })
}

/// Open `path` with the backend the traversal needs and classify its releases.
///
/// The in-process traversal reads tags and commits through gix as well, so it
/// runs without the `git` binary.
fn classify(path: &Path, option: &QueryOption, hooks: &dyn QueryHooks) -> KeysResult<Vec<Release>> {
  match option.traversal {
    TraversalKind::Native => {
      let git = SystemGit::open(path)?;
      Ok(query_releases(&git, &NativeGitTraversal::new(&git), option, hooks))
    }
    TraversalKind::InProcess => {
      let repo = GixRepository::open(path).map_err(|e| {
        tracing::debug!(error = %format!("{:#}", e), "gix could not open repository");
        KeysError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        })
      })?;
      Ok(query_releases(&repo, &InProcessTraversal::new(&repo), option, hooks))
    }
  }
}
