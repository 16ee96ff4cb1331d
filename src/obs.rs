//! Observability helpers shared by clients and engines.
//!
//! - Every client call and engine run is wrapped in a `tracing` span named
//!   `sso_broker.logic` carrying the `logic` (operation family) and `stage` (call site)
//!   fields.
//! - Enable the `metrics` feature to increment the `sso_broker_logic_total` counter for
//!   every attempt/success/failure, labeled by `logic` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation families observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicKind {
	/// Building the redirect to an identity provider.
	Redirect,
	/// Extracting, validating, and turning credentials into a profile.
	Authentication,
	/// Handling the provider's callback request.
	Callback,
	/// Local and central logout.
	Logout,
}
impl LogicKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogicKind::Redirect => "redirect",
			LogicKind::Authentication => "authentication",
			LogicKind::Callback => "callback",
			LogicKind::Logout => "logout",
		}
	}
}
impl Display for LogicKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure returned or handled.
	Failure,
}
impl LogicOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogicOutcome::Attempt => "attempt",
			LogicOutcome::Success => "success",
			LogicOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto its outcome label.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { LogicOutcome::Success } else { LogicOutcome::Failure }
	}
}
impl Display for LogicOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
