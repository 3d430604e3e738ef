//! CLI commands for four-keys
//!
//! - **metrics**: deployment frequency, lead time, time to restore and change
//!   failure rate for a repository (the default command)
//! - **releases**: the classified release list behind those numbers
//!
//! Both share `query`, which validates options, opens or clones the
//! repository and picks the traversal backend.

pub mod metrics;
pub mod output;
pub mod query;
pub mod releases;

pub use metrics::run_metrics;
pub use query::QueryRequest;
pub use releases::run_releases;
