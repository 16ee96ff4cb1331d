//! Framework-neutral strategy implementations covering the common redirect-based flows.

// self
use crate::{
	_prelude::*,
	action::RedirectAction,
	client::{
		Credentials, CredentialsExtractor, LogoutActionBuilder, ProfileCreator,
		RedirectActionBuilder, StrategyFuture, TokenCredentials,
	},
	context::WebContext,
	error::ConfigError,
	engine::CLIENT_NAME_PARAMETER,
	profile::{ClientName, UserProfile},
};

const DEFAULT_CALLBACK_PARAMETER: &str = "service";

/// Redirects to a provider login URL, passing the application's callback URL along.
///
/// The callback URL carries the `client_name` parameter when a client name is set so the
/// callback handler can route the return request back to the right client.
#[derive(Clone, Debug)]
pub struct UrlRedirectActionBuilder {
	login_url: Url,
	callback_url: Url,
	callback_parameter: String,
	client_name: Option<ClientName>,
}
impl UrlRedirectActionBuilder {
	/// Creates a builder for the provider login URL and the application callback URL.
	pub fn new(login_url: &str, callback_url: &str) -> Result<Self, ConfigError> {
		let login_url = Url::parse(login_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "login", source })?;
		let callback_url = Url::parse(callback_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "callback", source })?;

		Ok(Self {
			login_url,
			callback_url,
			callback_parameter: DEFAULT_CALLBACK_PARAMETER.into(),
			client_name: None,
		})
	}

	/// Overrides the login URL parameter carrying the callback URL (defaults to `service`).
	pub fn with_callback_parameter(mut self, name: impl Into<String>) -> Self {
		self.callback_parameter = name.into();

		self
	}

	/// Tags the callback URL with the client name.
	pub fn with_client_name(mut self, name: ClientName) -> Self {
		self.client_name = Some(name);

		self
	}

	/// Returns the fully-formed provider URL.
	pub fn location(&self) -> Url {
		let mut callback = self.callback_url.clone();

		if let Some(name) = &self.client_name {
			callback.query_pairs_mut().append_pair(CLIENT_NAME_PARAMETER, name);
		}

		let mut url = self.login_url.clone();

		url.query_pairs_mut().append_pair(&self.callback_parameter, callback.as_str());

		url
	}
}
impl RedirectActionBuilder for UrlRedirectActionBuilder {
	fn redirect<'a>(&'a self, context: &'a dyn WebContext) -> StrategyFuture<'a, RedirectAction> {
		Box::pin(async move { Ok(RedirectAction::redirect_for(context, self.location())) })
	}
}

/// Reads a single request parameter into [`TokenCredentials`]; blank values count as absent.
#[derive(Clone, Debug)]
pub struct ParameterExtractor {
	parameter: String,
}
impl ParameterExtractor {
	/// Creates an extractor for the named parameter (e.g. `code`, `ticket`, `SAMLResponse`).
	pub fn new(parameter: impl Into<String>) -> Self {
		Self { parameter: parameter.into() }
	}
}
impl CredentialsExtractor<TokenCredentials> for ParameterExtractor {
	fn extract<'a>(
		&'a self,
		context: &'a dyn WebContext,
	) -> StrategyFuture<'a, Option<TokenCredentials>> {
		Box::pin(async move {
			Ok(context
				.request_parameter(&self.parameter)
				.filter(|value| !value.trim().is_empty())
				.map(TokenCredentials::new))
		})
	}
}

/// Returns the profile the authenticator attached to the credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthenticatorProfileCreator;
impl<C> ProfileCreator<C> for AuthenticatorProfileCreator
where
	C: Credentials,
{
	fn create<'a>(
		&'a self,
		credentials: &'a C,
		_context: &'a dyn WebContext,
	) -> StrategyFuture<'a, UserProfile> {
		Box::pin(async move {
			credentials.user_profile().cloned().ok_or_else(|| {
				Error::technical("The authenticator did not attach a profile to the credentials.")
			})
		})
	}
}

/// Redirects to the provider's end-session endpoint.
///
/// The absolute post-logout target, when present, is passed in a configurable query
/// parameter; a profile attribute (typically an ID token) can be forwarded as a hint.
#[derive(Clone, Debug)]
pub struct UrlLogoutActionBuilder {
	logout_url: Url,
	redirect_parameter: Option<String>,
	hint: Option<(String, String)>,
}
impl UrlLogoutActionBuilder {
	/// Creates a builder for the provider end-session URL.
	pub fn new(logout_url: &str) -> Result<Self, ConfigError> {
		let logout_url = Url::parse(logout_url)
			.map_err(|source| ConfigError::InvalidUrl { field: "logout", source })?;

		Ok(Self { logout_url, redirect_parameter: None, hint: None })
	}

	/// Forwards the post-logout target in the named parameter (e.g. `post_logout_redirect_uri`).
	pub fn with_redirect_parameter(mut self, name: impl Into<String>) -> Self {
		self.redirect_parameter = Some(name.into());

		self
	}

	/// Forwards the string profile attribute `attribute` in the `parameter` query parameter.
	pub fn with_profile_hint(
		mut self,
		parameter: impl Into<String>,
		attribute: impl Into<String>,
	) -> Self {
		self.hint = Some((parameter.into(), attribute.into()));

		self
	}

	fn location(&self, profile: &UserProfile, target_url: Option<&str>) -> Url {
		let mut url = self.logout_url.clone();

		{
			let mut pairs = url.query_pairs_mut();

			if let Some((parameter, attribute)) = &self.hint
				&& let Some(value) = profile.attribute_as::<String>(attribute)
			{
				pairs.append_pair(parameter, &value);
			}
			if let (Some(parameter), Some(target)) = (&self.redirect_parameter, target_url) {
				pairs.append_pair(parameter, target);
			}
		}

		if url.query() == Some("") {
			url.set_query(None);
		}

		url
	}
}
impl LogoutActionBuilder for UrlLogoutActionBuilder {
	fn logout_action<'a>(
		&'a self,
		context: &'a dyn WebContext,
		profile: &'a UserProfile,
		target_url: Option<&'a str>,
	) -> StrategyFuture<'a, Option<RedirectAction>> {
		Box::pin(async move {
			Ok(Some(RedirectAction::redirect_for(context, self.location(profile, target_url))))
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{context::MemoryWebContext, profile::ProfileId};

	fn profile() -> UserProfile {
		UserProfile::for_client(
			ProfileId::new("jdoe").expect("Profile id fixture should be valid."),
			ClientName::new("OidcClient").expect("Client name fixture should be valid."),
		)
		.with_attribute("id_token", "eyJhbGciOi")
	}

	#[tokio::test]
	async fn redirect_builder_embeds_tagged_callback() {
		let builder = UrlRedirectActionBuilder::new(
			"https://sso.example.com/login",
			"https://app.example.com/callback",
		)
		.expect("Builder URLs should parse.")
		.with_client_name(ClientName::new("CasClient").expect("Client name should be valid."));
		let action = builder
			.redirect(&MemoryWebContext::new())
			.await
			.expect("Redirect should be computed.");
		let location = Url::parse(action.location().expect("Redirect should carry a location."))
			.expect("Location should be absolute.");
		let pairs: HashMap<_, _> = location.query_pairs().into_owned().collect();

		assert_eq!(action.status_code(), 302);
		assert_eq!(
			pairs.get("service").map(String::as_str),
			Some("https://app.example.com/callback?client_name=CasClient")
		);
	}

	#[test]
	fn invalid_urls_are_configuration_errors() {
		let err = UrlRedirectActionBuilder::new("not a url", "https://app.example.com/cb")
			.expect_err("Relative login URL should be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { field: "login", .. }));
		assert!(UrlLogoutActionBuilder::new("/logout").is_err());
	}

	#[tokio::test]
	async fn parameter_extractor_ignores_blank_values() {
		let extractor = ParameterExtractor::new("ticket");
		let blank = MemoryWebContext::new().with_parameter("ticket", "  ");
		let present = MemoryWebContext::new().with_parameter("ticket", "ST-1");

		assert!(extractor.extract(&blank).await.expect("Extraction should work.").is_none());
		assert_eq!(
			extractor
				.extract(&present)
				.await
				.expect("Extraction should work.")
				.expect("Ticket should be extracted.")
				.expose(),
			"ST-1"
		);
	}

	#[tokio::test]
	async fn authenticator_profile_creator_requires_attached_profile() {
		let context = MemoryWebContext::new();
		let mut credentials = TokenCredentials::new("code");

		assert!(
			AuthenticatorProfileCreator.create(&credentials, &context).await.is_err(),
			"Missing profile should be a technical error."
		);

		credentials.set_user_profile(profile());

		let created = AuthenticatorProfileCreator
			.create(&credentials, &context)
			.await
			.expect("Attached profile should be returned.");

		assert_eq!(created, profile());
	}

	#[tokio::test]
	async fn logout_builder_forwards_target_and_hint() {
		let builder = UrlLogoutActionBuilder::new("https://idp.example.com/end-session")
			.expect("Logout URL should parse.")
			.with_redirect_parameter("post_logout_redirect_uri")
			.with_profile_hint("id_token_hint", "id_token");
		let context = MemoryWebContext::new();
		let action = builder
			.logout_action(&context, &profile(), Some("https://app.example.com/bye"))
			.await
			.expect("Logout action should be computed.")
			.expect("Builder should always produce an action.");

		assert_eq!(
			action.location(),
			Some(
				"https://idp.example.com/end-session?id_token_hint=eyJhbGciOi&post_logout_redirect_uri=https%3A%2F%2Fapp.example.com%2Fbye"
			)
		);

		let bare = UrlLogoutActionBuilder::new("https://idp.example.com/end-session")
			.expect("Logout URL should parse.")
			.logout_action(&context, &profile(), None)
			.await
			.expect("Logout action should be computed.")
			.expect("Builder should always produce an action.");

		assert_eq!(bare.location(), Some("https://idp.example.com/end-session"));
	}
}
