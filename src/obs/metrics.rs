// self
use crate::obs::{LogicKind, LogicOutcome};

const LOGIC_COUNTER: &str = "sso_broker_logic_total";

/// Counts one `outcome` of a `kind` run.
///
/// Always emits a trace event; the `metrics` feature additionally increments
/// `sso_broker_logic_total{logic, outcome}` on the installed recorder.
pub fn record_logic_outcome(kind: LogicKind, outcome: LogicOutcome) {
	tracing::trace!(
		counter = LOGIC_COUNTER,
		logic = kind.as_str(),
		outcome = outcome.as_str(),
		"Logic outcome."
	);

	#[cfg(feature = "metrics")]
	metrics::counter!(LOGIC_COUNTER, "logic" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
}
