//! Release metrics engine
//!
//! - **traversal**: fix detection and lead time for one commit range
//! - **sources**: tags resolved to commits, newest first
//! - **classifier**: success/failure and restore time per release
//! - **aggregate**: deployment frequency, lead time, time to restore, failure rate

pub mod aggregate;
pub mod classifier;
pub mod sources;
pub mod traversal;

#[cfg(test)]
mod fixtures;

pub use aggregate::{Metrics, compute_metrics};
pub use classifier::{Release, query_releases};
pub use traversal::{InProcessTraversal, NativeGitTraversal};
