//! Default command: the four key metrics as JSON

use crate::commands::output::{MetricsOutput, OptionSummary, print_json};
use crate::commands::query::{QueryRequest, run_query};
use crate::core::error::KeysResult;
use crate::core::hooks::QueryHooks;
use crate::metrics::compute_metrics;

/// Run the metrics summary
pub fn run_metrics(request: QueryRequest, pretty: bool, hooks: &dyn QueryHooks) -> KeysResult<()> {
  let outcome = run_query(request, hooks)?;
  let metrics = compute_metrics(&outcome.releases, &outcome.option.window);
  tracing::debug!(releases = outcome.releases.len(), ?metrics, "computed metrics");

  let output = MetricsOutput::new(OptionSummary::new(&outcome.repository, &outcome.option), &metrics);
  print_json(&output, pretty)
}
