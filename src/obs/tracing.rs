// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::{_prelude::*, obs::LogicKind};

/// Span wrapper used by clients and engines.
#[derive(Clone, Debug)]
pub struct LogicSpan {
	span: Span,
}
impl LogicSpan {
	/// Creates a new span tagged with the provided logic kind + stage.
	pub fn new(kind: LogicKind, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("sso_broker.logic", logic = kind.as_str(), stage) }
	}

	/// Creates a span that additionally records the client the call is routed to.
	pub fn for_client(kind: LogicKind, stage: &'static str, client: &str) -> Self {
		Self {
			span: tracing::info_span!("sso_broker.logic", logic = kind.as_str(), stage, client),
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = LogicSpan::for_client(LogicKind::Redirect, "instrument_wraps_future", "cas");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
