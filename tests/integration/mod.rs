//! Integration tests for four-keys
//!
//! Each test builds a throwaway git repository with fixed commit dates and
//! runs the compiled binary against it.

mod test_errors;
mod test_metrics;
mod test_releases;
