//! Strategy composition for indirect clients.
//!
//! [`AuthPipelineBuilder`] collects the four strategies with set-once setters: the first
//! assignment of each slot wins and later ones are ignored. [`AuthPipelineBuilder::build`]
//! refuses to produce a pipeline unless every slot is filled and runs the authenticator's
//! one-time initialization, so a built [`AuthPipeline`] is always complete and can never
//! swap a strategy while requests are in flight.

// self
use crate::{
	_prelude::*,
	action::RedirectAction,
	client::{
		Authenticator, AuthenticatorCapability, Credentials, CredentialsExtractor, ProfileCreator,
		RedirectActionBuilder,
	},
	context::WebContext,
	error::ConfigError,
	profile::UserProfile,
};

/// Builder for [`AuthPipeline`] values.
pub struct AuthPipelineBuilder<C>
where
	C: Credentials,
{
	redirect_action_builder: Option<Arc<dyn RedirectActionBuilder>>,
	credentials_extractor: Option<Arc<dyn CredentialsExtractor<C>>>,
	authenticator: Option<Arc<dyn Authenticator<C>>>,
	profile_creator: Option<Arc<dyn ProfileCreator<C>>>,
}
impl<C> AuthPipelineBuilder<C>
where
	C: Credentials,
{
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self {
			redirect_action_builder: None,
			credentials_extractor: None,
			authenticator: None,
			profile_creator: None,
		}
	}

	/// Sets the redirect builder unless one is already set.
	pub fn redirect_action_builder(mut self, builder: Arc<dyn RedirectActionBuilder>) -> Self {
		self.redirect_action_builder.get_or_insert(builder);

		self
	}

	/// Sets the credentials extractor unless one is already set.
	pub fn credentials_extractor(mut self, extractor: Arc<dyn CredentialsExtractor<C>>) -> Self {
		self.credentials_extractor.get_or_insert(extractor);

		self
	}

	/// Sets the authenticator unless one is already set.
	pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator<C>>) -> Self {
		self.authenticator.get_or_insert(authenticator);

		self
	}

	/// Sets the profile creator unless one is already set.
	pub fn profile_creator(mut self, creator: Arc<dyn ProfileCreator<C>>) -> Self {
		self.profile_creator.get_or_insert(creator);

		self
	}

	/// Validates the configuration and initializes the authenticator.
	pub fn build(self) -> Result<AuthPipeline<C>> {
		let redirect_action_builder = self
			.redirect_action_builder
			.ok_or(ConfigError::MissingStrategy { strategy: "redirect_action_builder" })?;
		let credentials_extractor = self
			.credentials_extractor
			.ok_or(ConfigError::MissingStrategy { strategy: "credentials_extractor" })?;
		let authenticator =
			self.authenticator.ok_or(ConfigError::MissingStrategy { strategy: "authenticator" })?;
		let profile_creator = self
			.profile_creator
			.ok_or(ConfigError::MissingStrategy { strategy: "profile_creator" })?;

		authenticator.init()?;

		Ok(AuthPipeline {
			redirect_action_builder,
			credentials_extractor,
			authenticator,
			profile_creator,
		})
	}
}
impl<C> Default for AuthPipelineBuilder<C>
where
	C: Credentials,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<C> Debug for AuthPipelineBuilder<C>
where
	C: Credentials,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthPipelineBuilder")
			.field("redirect_action_builder_set", &self.redirect_action_builder.is_some())
			.field("credentials_extractor_set", &self.credentials_extractor.is_some())
			.field("authenticator", &self.authenticator.as_ref().map(|a| a.name().to_owned()))
			.field("profile_creator_set", &self.profile_creator.is_some())
			.finish()
	}
}

/// Immutable redirect → extract → validate → create pipeline.
pub struct AuthPipeline<C>
where
	C: Credentials,
{
	redirect_action_builder: Arc<dyn RedirectActionBuilder>,
	credentials_extractor: Arc<dyn CredentialsExtractor<C>>,
	authenticator: Arc<dyn Authenticator<C>>,
	profile_creator: Arc<dyn ProfileCreator<C>>,
}
impl<C> AuthPipeline<C>
where
	C: Credentials,
{
	/// Creates a new builder.
	pub fn builder() -> AuthPipelineBuilder<C> {
		AuthPipelineBuilder::new()
	}

	/// Configured authenticator (possibly a decorator).
	pub fn authenticator(&self) -> &Arc<dyn Authenticator<C>> {
		&self.authenticator
	}

	/// Computes the redirect to the identity provider.
	///
	/// Builder failures propagate unchanged; [`Error::Action`] is how a builder asks for a
	/// different protocol answer.
	pub async fn redirect_action(&self, context: &dyn WebContext) -> Result<RedirectAction> {
		self.redirect_action_builder.redirect(context).await
	}

	/// Extracts and validates credentials.
	///
	/// Returns `Ok(None)` when the request carries no credentials or when they are rejected
	/// with [`Error::Credentials`]; rejections are logged, never propagated. Every other
	/// error propagates.
	pub async fn retrieve_credentials(&self, context: &dyn WebContext) -> Result<Option<C>> {
		match self.extract_and_validate(context).await {
			Err(Error::Credentials(e)) => {
				tracing::error!(
					authenticator = self.authenticator.name(),
					error = %e,
					"Failed to retrieve or validate credentials."
				);

				Ok(None)
			},
			result => result,
		}
	}

	/// Turns validated credentials into a profile, returned as the creator produced it.
	pub async fn create_profile(
		&self,
		credentials: &C,
		context: &dyn WebContext,
	) -> Result<UserProfile> {
		let profile = self.profile_creator.create(credentials, context).await?;

		tracing::debug!(profile = ?profile.id(), client = ?profile.client_name(), "Profile created.");

		Ok(profile)
	}

	/// Checks that the authenticator (unwrapped from one decorator level) declares every
	/// `required` capability.
	pub fn assert_authenticator_capabilities(
		&self,
		required: &[AuthenticatorCapability],
	) -> Result<(), ConfigError> {
		let authenticator =
			self.authenticator.delegate().unwrap_or_else(|| self.authenticator.as_ref());
		let declared = authenticator.capabilities();

		match required.iter().find(|capability| !declared.contains(capability)) {
			Some(missing) => Err(ConfigError::UnsupportedAuthenticator {
				authenticator: authenticator.name().to_owned(),
				capability: *missing,
			}),
			None => Ok(()),
		}
	}

	async fn extract_and_validate(&self, context: &dyn WebContext) -> Result<Option<C>> {
		let Some(mut credentials) = self.credentials_extractor.extract(context).await? else {
			return Ok(None);
		};

		self.authenticator.validate(&mut credentials, context).await?;

		Ok(Some(credentials))
	}
}
impl<C> Clone for AuthPipeline<C>
where
	C: Credentials,
{
	fn clone(&self) -> Self {
		Self {
			redirect_action_builder: self.redirect_action_builder.clone(),
			credentials_extractor: self.credentials_extractor.clone(),
			authenticator: self.authenticator.clone(),
			profile_creator: self.profile_creator.clone(),
		}
	}
}
impl<C> Debug for AuthPipeline<C>
where
	C: Credentials,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthPipeline").field("authenticator", &self.authenticator.name()).finish()
	}
}
