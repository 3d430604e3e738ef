//! `four-keys releases`: every classified release as JSON, oldest first

use crate::commands::output::{OptionSummary, ReleaseOutput, ReleasesOutput, print_json};
use crate::commands::query::{QueryRequest, run_query};
use crate::core::error::KeysResult;
use crate::core::hooks::QueryHooks;

/// Run the release listing
pub fn run_releases(request: QueryRequest, pretty: bool, hooks: &dyn QueryHooks) -> KeysResult<()> {
  let outcome = run_query(request, hooks)?;

  let output = ReleasesOutput {
    option: OptionSummary::new(&outcome.repository, &outcome.option),
    releases: outcome.releases.iter().map(ReleaseOutput::from).collect(),
  };
  print_json(&output, pretty)
}
