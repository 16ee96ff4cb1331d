//! Application logout: open-redirect-safe post-logout redirect, local profile removal,
//! and central logout at the first provider that offers one.

// crates.io
use regex::Regex;
// self
use crate::{
	_prelude::*,
	action::{HttpAction, HttpActionAdapter, RedirectAction},
	client::ClientRegistry,
	context::WebContext,
	engine::{DEFAULT_LOGOUT_URL_PATTERN, ExceptionHandler, URL_PARAMETER},
	error::ConfigError,
	obs::{self, LogicKind, LogicOutcome, LogicSpan},
	profile::UserProfile,
	session::ProfileManager,
};

/// Per-call logout settings; every field falls back to a default when unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoutOptions {
	/// URL used when the request carries no acceptable `url` parameter.
	pub default_url: Option<String>,
	/// Pattern the requested `url` must fully match (defaults to same-origin paths).
	pub logout_url_pattern: Option<String>,
	/// Remove the application profiles (defaults to true).
	pub local_logout: Option<bool>,
	/// Destroy the whole session after local logout (defaults to false).
	pub destroy_session: Option<bool>,
	/// Ask identity providers to end their sessions too (defaults to false).
	pub central_logout: Option<bool>,
}
impl LogoutOptions {
	/// Creates options with every setting left at its default.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the fallback redirect URL.
	pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
		self.default_url = Some(url.into());

		self
	}

	/// Sets the pattern requested URLs must match.
	pub fn with_logout_url_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.logout_url_pattern = Some(pattern.into());

		self
	}

	/// Enables or disables local logout.
	pub fn with_local_logout(mut self, enabled: bool) -> Self {
		self.local_logout = Some(enabled);

		self
	}

	/// Enables or disables session destruction.
	pub fn with_destroy_session(mut self, enabled: bool) -> Self {
		self.destroy_session = Some(enabled);

		self
	}

	/// Enables or disables central logout.
	pub fn with_central_logout(mut self, enabled: bool) -> Self {
		self.central_logout = Some(enabled);

		self
	}

	/// Applies defaults and validates the pattern.
	pub fn resolve(&self) -> Result<ResolvedLogoutOptions, ConfigError> {
		let pattern = self.logout_url_pattern.as_deref().unwrap_or(DEFAULT_LOGOUT_URL_PATTERN);

		if pattern.trim().is_empty() {
			return Err(ConfigError::BlankLogoutUrlPattern);
		}

		// Anchor the whole expression so alternations cannot match a prefix only.
		let logout_url_pattern = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
			ConfigError::InvalidLogoutUrlPattern { pattern: pattern.to_owned(), source }
		})?;

		Ok(ResolvedLogoutOptions {
			default_url: self.default_url.clone(),
			logout_url_pattern,
			local_logout: self.local_logout.unwrap_or(true),
			destroy_session: self.destroy_session.unwrap_or(false),
			central_logout: self.central_logout.unwrap_or(false),
		})
	}
}

/// [`LogoutOptions`] with defaults applied and the pattern compiled.
#[derive(Clone, Debug)]
pub struct ResolvedLogoutOptions {
	/// Fallback redirect URL.
	pub default_url: Option<String>,
	/// Whole-string pattern requested URLs must match.
	pub logout_url_pattern: Regex,
	/// Remove application profiles.
	pub local_logout: bool,
	/// Destroy the session after local logout.
	pub destroy_session: bool,
	/// Ask identity providers to end their sessions.
	pub central_logout: bool,
}
impl ResolvedLogoutOptions {
	/// Returns the requested URL when it matches the pattern, else the default URL.
	pub fn redirect_url(&self, requested: Option<&str>) -> Option<String> {
		match requested {
			Some(url) if self.logout_url_pattern.is_match(url) => Some(url.to_owned()),
			_ => self.default_url.clone(),
		}
	}
}

/// Logout orchestrator.
#[derive(Clone, Debug, Default)]
pub struct LogoutLogic {
	exception_handler: ExceptionHandler,
}
impl LogoutLogic {
	/// Creates the logic with the default error handling.
	pub fn new() -> Self {
		Self::default()
	}

	/// Redirects non-configuration failures to `url`.
	pub fn with_error_url(mut self, url: impl Into<String>) -> Self {
		self.exception_handler = self.exception_handler.with_error_url(url);

		self
	}

	/// Runs a logout for the current request and returns the adapted response.
	///
	/// Configuration faults (blank or invalid pattern) are returned as `Err`; everything
	/// else is converted into a response by the exception handler. Hosts serving many
	/// requests with the same options can resolve them once and call
	/// [`LogoutLogic::perform_resolved`] instead.
	pub async fn perform<A>(
		&self,
		context: &dyn WebContext,
		registry: &dyn ClientRegistry,
		adapter: &A,
		options: &LogoutOptions,
	) -> Result<A::Response>
	where
		A: ?Sized + HttpActionAdapter,
	{
		match options.resolve() {
			Ok(options) => self.perform_resolved(context, registry, adapter, &options).await,
			Err(e) => {
				obs::record_logic_outcome(LogicKind::Logout, LogicOutcome::Failure);

				self.exception_handler.handle(e.into(), adapter, context)
			},
		}
	}

	/// Runs a logout with options resolved ahead of time.
	pub async fn perform_resolved<A>(
		&self,
		context: &dyn WebContext,
		registry: &dyn ClientRegistry,
		adapter: &A,
		options: &ResolvedLogoutOptions,
	) -> Result<A::Response>
	where
		A: ?Sized + HttpActionAdapter,
	{
		let span = LogicSpan::new(LogicKind::Logout, "perform");

		obs::record_logic_outcome(LogicKind::Logout, LogicOutcome::Attempt);

		let result = span.instrument(self.plan(context, registry, options)).await;

		obs::record_logic_outcome(LogicKind::Logout, LogicOutcome::of(&result));

		match result {
			Ok(action) => Ok(adapter.adapt(action, context)),
			Err(e) => self.exception_handler.handle(e, adapter, context),
		}
	}

	async fn plan(
		&self,
		context: &dyn WebContext,
		registry: &dyn ClientRegistry,
		options: &ResolvedLogoutOptions,
	) -> Result<HttpAction> {
		let manager = ProfileManager::new(context);
		let profiles = manager.get_all(true).await?;
		let redirect_url =
			options.redirect_url(context.request_parameter(URL_PARAMETER).as_deref());

		tracing::debug!(
			redirect_url = ?redirect_url,
			profiles = profiles.len(),
			"Logout requested."
		);

		let mut action = match &redirect_url {
			Some(url) => HttpAction::from(RedirectAction::redirect_for(context, url.as_str())),
			None => HttpAction::from(RedirectAction::NoContent),
		};

		if options.local_logout || profiles.len() > 1 {
			tracing::debug!("Performing application logout.");

			manager.logout().await?;

			if options.destroy_session {
				destroy_session(&manager).await;
			}
		}
		if options.central_logout {
			tracing::debug!("Performing central logout.");

			let target_url = redirect_url.as_deref().filter(|url| is_absolute_http_url(url));
			let central = central_logout_action(context, registry, &profiles, target_url).await?;

			if let Some(central) = central {
				tracing::debug!(action = %central, "Central logout action selected.");

				action = central.into();
			}
		}

		Ok(action)
	}
}

async fn destroy_session(manager: &ProfileManager) {
	let Some(store) = manager.session_store() else {
		tracing::error!("Unable to destroy the web session: no session store is available.");

		return;
	};

	match store.destroy_session().await {
		Ok(true) => tracing::debug!("Web session destroyed."),
		Ok(false) => {
			tracing::error!("Unable to destroy the web session: not supported by the store.")
		},
		Err(e) => tracing::error!(error = %e, "Unable to destroy the web session."),
	}
}

async fn central_logout_action(
	context: &dyn WebContext,
	registry: &dyn ClientRegistry,
	profiles: &[UserProfile],
	target_url: Option<&str>,
) -> Result<Option<RedirectAction>> {
	for profile in profiles {
		let Some(client_name) = profile.client_name() else {
			continue;
		};
		let Some(client) = registry.find_client(client_name) else {
			tracing::debug!(client = %client_name, "Skipping central logout: unknown client.");

			continue;
		};

		if let Some(action) = client.logout_action(context, profile, target_url).await? {
			return Ok(Some(action));
		}
	}

	Ok(None)
}

// Providers may only send the user agent back to an absolute http(s) URL.
fn is_absolute_http_url(url: &str) -> bool {
	(url.starts_with("http://") || url.starts_with("https://"))
		&& Url::parse(url).is_ok_and(|parsed| parsed.has_host())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_are_applied() {
		let resolved = LogoutOptions::new().resolve().expect("Defaults should resolve.");

		assert!(resolved.local_logout);
		assert!(!resolved.destroy_session);
		assert!(!resolved.central_logout);
		assert!(resolved.default_url.is_none());
	}

	#[test]
	fn default_pattern_only_accepts_relative_paths() {
		let resolved = LogoutOptions::new()
			.with_default_url("/home")
			.resolve()
			.expect("Defaults should resolve.");

		assert_eq!(resolved.redirect_url(Some("/")).as_deref(), Some("/"));
		assert_eq!(resolved.redirect_url(Some("/bye")).as_deref(), Some("/bye"));
		assert_eq!(resolved.redirect_url(Some("//evil.example.com")).as_deref(), Some("/home"));
		assert_eq!(
			resolved.redirect_url(Some("https://evil.example.com")).as_deref(),
			Some("/home")
		);
		assert_eq!(resolved.redirect_url(None).as_deref(), Some("/home"));
	}

	#[test]
	fn pattern_must_match_the_whole_url() {
		let resolved = LogoutOptions::new()
			.with_default_url("/home")
			.with_logout_url_pattern("/app/.*|/public")
			.resolve()
			.expect("Pattern should compile.");

		assert_eq!(resolved.redirect_url(Some("/app/ok")).as_deref(), Some("/app/ok"));
		assert_eq!(resolved.redirect_url(Some("/public/x")).as_deref(), Some("/home"));
		assert_eq!(resolved.redirect_url(Some("/evil/app/x")).as_deref(), Some("/home"));
	}

	#[test]
	fn blank_and_invalid_patterns_are_configuration_errors() {
		let blank = LogoutOptions::new()
			.with_logout_url_pattern("  ")
			.resolve()
			.expect_err("Blank pattern should be rejected.");

		assert!(matches!(blank, ConfigError::BlankLogoutUrlPattern));

		let invalid = LogoutOptions::new()
			.with_logout_url_pattern("(")
			.resolve()
			.expect_err("Invalid pattern should be rejected.");

		assert!(matches!(
			invalid,
			ConfigError::InvalidLogoutUrlPattern { pattern, .. } if pattern == "("
		));
	}

	#[test]
	fn options_deserialize_with_defaults() {
		let options: LogoutOptions =
			serde_json::from_str(r#"{"default_url":"/home","central_logout":true}"#)
				.expect("Options should deserialize.");

		assert_eq!(
			options,
			LogoutOptions::new().with_default_url("/home").with_central_logout(true)
		);
	}

	#[test]
	fn absolute_http_urls_are_detected() {
		assert!(is_absolute_http_url("https://app.example.com/bye"));
		assert!(is_absolute_http_url("http://localhost:8080"));
		assert!(!is_absolute_http_url("/bye"));
		assert!(!is_absolute_http_url("ftp://files.example.com"));
		assert!(!is_absolute_http_url("https://"));
		assert!(!is_absolute_http_url("httpsx://app.example.com"));
	}
}
