//! Callback handling: finish a login at the client named in the return request.

// self
use crate::{
	_prelude::*,
	action::{HttpAction, HttpActionAdapter, RedirectAction},
	client::{Client, ClientRegistry},
	context::WebContext,
	engine::{CLIENT_NAME_PARAMETER, ExceptionHandler},
	obs::{self, LogicKind, LogicOutcome, LogicSpan},
	session::ProfileManager,
};

/// Per-call callback settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackOptions {
	/// Where the user agent lands once the login is complete.
	pub default_url: String,
	/// Persist the profile in the session.
	pub save_in_session: bool,
	/// Keep profiles from other clients alongside the new one.
	pub multi_profile: bool,
}
impl CallbackOptions {
	/// Sets the post-login URL.
	pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
		self.default_url = url.into();

		self
	}

	/// Controls whether the profile is written to the session.
	pub fn with_save_in_session(mut self, enabled: bool) -> Self {
		self.save_in_session = enabled;

		self
	}

	/// Controls whether profiles from several clients are kept.
	pub fn with_multi_profile(mut self, enabled: bool) -> Self {
		self.multi_profile = enabled;

		self
	}
}
impl Default for CallbackOptions {
	fn default() -> Self {
		Self { default_url: "/".into(), save_in_session: true, multi_profile: false }
	}
}

/// Callback orchestrator.
#[derive(Clone, Debug, Default)]
pub struct CallbackLogic {
	exception_handler: ExceptionHandler,
}
impl CallbackLogic {
	/// Creates the logic with the default error handling.
	pub fn new() -> Self {
		Self::default()
	}

	/// Redirects non-configuration failures to `url`.
	pub fn with_error_url(mut self, url: impl Into<String>) -> Self {
		self.exception_handler = self.exception_handler.with_error_url(url);

		self
	}

	/// Authenticates the return request and redirects to the post-login URL.
	///
	/// An anonymous result (no or rejected credentials) still redirects; only the profile
	/// save is skipped.
	pub async fn perform<A>(
		&self,
		context: &dyn WebContext,
		registry: &dyn ClientRegistry,
		adapter: &A,
		options: &CallbackOptions,
	) -> Result<A::Response>
	where
		A: ?Sized + HttpActionAdapter,
	{
		let span = LogicSpan::new(LogicKind::Callback, "perform");

		obs::record_logic_outcome(LogicKind::Callback, LogicOutcome::Attempt);

		let result = span.instrument(self.run(context, registry, options)).await;

		obs::record_logic_outcome(LogicKind::Callback, LogicOutcome::of(&result));

		match result {
			Ok(action) => Ok(adapter.adapt(action, context)),
			Err(e) => self.exception_handler.handle(e, adapter, context),
		}
	}

	async fn run(
		&self,
		context: &dyn WebContext,
		registry: &dyn ClientRegistry,
		options: &CallbackOptions,
	) -> Result<HttpAction> {
		let client = find_client(context, registry)?;
		let profile = client.user_profile(context).await?;

		tracing::debug!(
			client = %client.name(),
			authenticated = profile.is_some(),
			"Callback handled."
		);

		if let Some(profile) = profile {
			ProfileManager::new(context)
				.save(profile, options.save_in_session, options.multi_profile)
				.await?;
		}

		Ok(RedirectAction::redirect_for(context, options.default_url.as_str()).into())
	}
}

fn find_client(
	context: &dyn WebContext,
	registry: &dyn ClientRegistry,
) -> Result<Arc<dyn Client>> {
	match context.request_parameter(CLIENT_NAME_PARAMETER) {
		Some(name) => registry
			.find_client(&name)
			.ok_or_else(|| Error::technical(format!("No client named `{name}` is configured."))),
		None => registry
			.default_client()
			.ok_or_else(|| Error::technical("The callback names no client and no default is set.")),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_follow_single_profile_session_login() {
		let options = CallbackOptions::default();

		assert_eq!(options.default_url, "/");
		assert!(options.save_in_session);
		assert!(!options.multi_profile);

		let parsed: CallbackOptions = serde_json::from_str(r#"{"multi_profile":true}"#)
			.expect("Options should deserialize.");

		assert_eq!(parsed, CallbackOptions::default().with_multi_profile(true));
	}
}
