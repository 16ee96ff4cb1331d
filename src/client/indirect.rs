//! Redirect-based client binding an [`AuthPipeline`] to a name.

// self
use crate::{
	_prelude::*,
	action::RedirectAction,
	client::{
		AuthPipeline, AuthenticatorCapability, Client, ClientFuture, Credentials,
		LogoutActionBuilder,
	},
	context::WebContext,
	obs::{self, LogicKind, LogicOutcome, LogicSpan},
	profile::{ClientName, UserProfile},
};

/// Indirect client: the user agent is redirected to the provider and comes back with
/// credentials on the callback URL.
pub struct IndirectClient<C>
where
	C: Credentials,
{
	name: ClientName,
	pipeline: AuthPipeline<C>,
	logout_action_builder: Option<Arc<dyn LogoutActionBuilder>>,
}
impl<C> IndirectClient<C>
where
	C: Credentials,
{
	/// Creates a client from a built pipeline.
	pub fn new(name: ClientName, pipeline: AuthPipeline<C>) -> Self {
		Self { name, pipeline, logout_action_builder: None }
	}

	/// Enables central logout through the given builder.
	pub fn with_logout_action_builder(mut self, builder: Arc<dyn LogoutActionBuilder>) -> Self {
		self.logout_action_builder = Some(builder);

		self
	}

	/// Fails unless the authenticator supports every capability the protocol needs.
	pub fn require_authenticator_capabilities(
		self,
		required: &[AuthenticatorCapability],
	) -> Result<Self> {
		self.pipeline.assert_authenticator_capabilities(required)?;

		Ok(self)
	}

	/// Underlying strategy pipeline.
	pub fn pipeline(&self) -> &AuthPipeline<C> {
		&self.pipeline
	}

	async fn resolve_profile(&self, context: &dyn WebContext) -> Result<Option<UserProfile>> {
		let Some(credentials) = self.pipeline.retrieve_credentials(context).await? else {
			tracing::debug!("No credentials found; the request stays anonymous.");

			return Ok(None);
		};
		let profile = self.pipeline.create_profile(&credentials, context).await?;

		Ok(Some(profile))
	}
}
impl<C> Client for IndirectClient<C>
where
	C: Credentials,
{
	fn name(&self) -> &ClientName {
		&self.name
	}

	fn redirect_action<'a>(
		&'a self,
		context: &'a dyn WebContext,
	) -> ClientFuture<'a, RedirectAction> {
		Box::pin(async move {
			let span = LogicSpan::for_client(LogicKind::Redirect, "redirect_action", &self.name);

			obs::record_logic_outcome(LogicKind::Redirect, LogicOutcome::Attempt);

			let result = span.instrument(self.pipeline.redirect_action(context)).await;

			obs::record_logic_outcome(LogicKind::Redirect, LogicOutcome::of(&result));

			result
		})
	}

	fn user_profile<'a>(
		&'a self,
		context: &'a dyn WebContext,
	) -> ClientFuture<'a, Option<UserProfile>> {
		Box::pin(async move {
			let span = LogicSpan::for_client(LogicKind::Authentication, "user_profile", &self.name);

			obs::record_logic_outcome(LogicKind::Authentication, LogicOutcome::Attempt);

			let result = span.instrument(self.resolve_profile(context)).await;

			obs::record_logic_outcome(LogicKind::Authentication, LogicOutcome::of(&result));

			result
		})
	}

	fn logout_action<'a>(
		&'a self,
		context: &'a dyn WebContext,
		profile: &'a UserProfile,
		target_url: Option<&'a str>,
	) -> ClientFuture<'a, Option<RedirectAction>> {
		Box::pin(async move {
			match &self.logout_action_builder {
				Some(builder) => builder.logout_action(context, profile, target_url).await,
				None => Ok(None),
			}
		})
	}
}
impl<C> Debug for IndirectClient<C>
where
	C: Credentials,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IndirectClient")
			.field("name", &self.name)
			.field("pipeline", &self.pipeline)
			.field("central_logout", &self.logout_action_builder.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		client::{
			Authenticator, AuthenticatorProfileCreator, ParameterExtractor, StrategyFuture,
			TokenCredentials, UrlLogoutActionBuilder, UrlRedirectActionBuilder,
		},
		context::MemoryWebContext,
		error::ConfigError,
		profile::ProfileId,
	};

	struct TicketAuthenticator;
	impl Authenticator<TokenCredentials> for TicketAuthenticator {
		fn validate<'a>(
			&'a self,
			credentials: &'a mut TokenCredentials,
			_context: &'a dyn WebContext,
		) -> StrategyFuture<'a, ()> {
			Box::pin(async move {
				let profile = UserProfile::for_client(
					ProfileId::new(format!("user-{}", credentials.expose()))
						.expect("Derived profile id should be valid."),
					ClientName::new("CasClient").expect("Client name should be valid."),
				);

				credentials.set_user_profile(profile);

				Ok(())
			})
		}

		fn capabilities(&self) -> &[AuthenticatorCapability] {
			&[AuthenticatorCapability::Ticket]
		}
	}

	fn client() -> IndirectClient<TokenCredentials> {
		let name = ClientName::new("CasClient").expect("Client name should be valid.");
		let pipeline = AuthPipeline::<TokenCredentials>::builder()
			.redirect_action_builder(Arc::new(
				UrlRedirectActionBuilder::new(
					"https://cas.example.com/login",
					"https://app.example.com/callback",
				)
				.expect("Builder URLs should parse.")
				.with_client_name(name.clone()),
			))
			.credentials_extractor(Arc::new(ParameterExtractor::new("ticket")))
			.authenticator(Arc::new(TicketAuthenticator))
			.profile_creator(Arc::new(AuthenticatorProfileCreator))
			.build()
			.expect("Pipeline should build.");

		IndirectClient::new(name, pipeline)
	}

	#[tokio::test]
	async fn user_profile_runs_full_pipeline() {
		let client = client();
		let anonymous = client
			.user_profile(&MemoryWebContext::new())
			.await
			.expect("Anonymous request should not fail.");

		assert!(anonymous.is_none());

		let profile = client
			.user_profile(&MemoryWebContext::new().with_parameter("ticket", "ST-9"))
			.await
			.expect("Ticket should validate.")
			.expect("Profile should be produced.");

		assert_eq!(profile.id().to_string(), "user-ST-9");
	}

	#[tokio::test]
	async fn logout_action_declines_without_builder() {
		let client = client();
		let context = MemoryWebContext::new();
		let profile = UserProfile::new(ProfileId::new("jdoe").expect("Profile id should be valid."));

		assert!(
			client
				.logout_action(&context, &profile, None)
				.await
				.expect("Declining should not fail.")
				.is_none()
		);

		let client = client.with_logout_action_builder(Arc::new(
			UrlLogoutActionBuilder::new("https://cas.example.com/logout")
				.expect("Logout URL should parse.")
				.with_redirect_parameter("service"),
		));
		let action = client
			.logout_action(&context, &profile, Some("https://app.example.com/"))
			.await
			.expect("Logout action should be computed.")
			.expect("Builder should produce an action.");

		assert_eq!(
			action.location(),
			Some("https://cas.example.com/logout?service=https%3A%2F%2Fapp.example.com%2F")
		);
	}

	#[test]
	fn capability_requirements_are_checked_at_setup() {
		let client = client()
			.require_authenticator_capabilities(&[AuthenticatorCapability::Ticket])
			.expect("Ticket authenticator should be accepted.");
		let err = client
			.require_authenticator_capabilities(&[AuthenticatorCapability::Assertion])
			.expect_err("Assertion capability should be missing.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::UnsupportedAuthenticator {
				capability: AuthenticatorCapability::Assertion,
				..
			})
		));
	}
}
