//! Building blocks shared by every four-keys command
//!
//! - **config**: query options from flags and `four-keys.toml`
//! - **error**: error types with contextual help and exit codes
//! - **hooks**: timing and debug callbacks around query phases
//! - **vcs**: git access (`git` subprocess and gix)

pub mod config;
pub mod error;
pub mod hooks;
pub mod vcs;
