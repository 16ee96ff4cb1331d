//! Shared error-to-response routing for engines.

// self
use crate::{
	_prelude::*,
	action::{HttpAction, HttpActionAdapter, RedirectAction},
	context::WebContext,
};

/// Turns engine failures into host responses.
///
/// Configuration faults are returned as `Err` so misconfiguration fails loudly. A
/// [`Error::Action`] is adapted as-is; anything else redirects to the configured error URL
/// or, without one, is handed to [`HttpActionAdapter::adapt_error`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExceptionHandler {
	error_url: Option<String>,
}
impl ExceptionHandler {
	/// Creates a handler without an error URL.
	pub fn new() -> Self {
		Self::default()
	}

	/// Redirects handled errors to `url`.
	pub fn with_error_url(mut self, url: impl Into<String>) -> Self {
		self.error_url = Some(url.into());

		self
	}

	/// Configured error URL, if any.
	pub fn error_url(&self) -> Option<&str> {
		self.error_url.as_deref()
	}

	/// Routes `error` to a response.
	pub fn handle<A>(
		&self,
		error: Error,
		adapter: &A,
		context: &dyn WebContext,
	) -> Result<A::Response>
	where
		A: ?Sized + HttpActionAdapter,
	{
		if error.is_fatal() {
			tracing::error!(error = %error, "Configuration error; refusing to produce a response.");

			return Err(error);
		}

		tracing::error!(error = %error, "Request failed.");

		match error {
			Error::Action(action) => Ok(adapter.adapt(action, context)),
			error => match &self.error_url {
				Some(url) => Ok(adapter.adapt(
					HttpAction::from(RedirectAction::redirect_for(context, url.as_str())),
					context,
				)),
				None => Ok(adapter.adapt_error(&error, context)),
			},
		}
	}
}
