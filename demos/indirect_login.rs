//! Walks an indirect CAS-style login end to end: redirect to the provider, return with a
//! ticket, validate it through a caching authenticator, and save the profile in the session.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use time::Duration;
// self
use sso_broker::{
	action::PlainResponseAdapter,
	client::{
		AuthPipeline, Authenticator, AuthenticatorCapability, AuthenticatorProfileCreator, Client,
		Clients, Credentials, IndirectClient, LocalCachingAuthenticator, ParameterExtractor,
		StrategyFuture, TokenCredentials, UrlRedirectActionBuilder,
	},
	context::{MemoryWebContext, WebContext},
	engine::{CallbackLogic, CallbackOptions},
	error::{ConfigError, CredentialsError, Error},
	profile::{ClientName, ProfileId, UserProfile},
	session::{MemorySessionStore, ProfileManager},
};

const CAS_CLIENT: &str = "CasClient";

/// Stand-in for a network ticket validator: `ST-<user>` tickets are valid.
struct DemoTicketValidator;
impl Authenticator<TokenCredentials> for DemoTicketValidator {
	fn validate<'a>(
		&'a self,
		credentials: &'a mut TokenCredentials,
		_context: &'a dyn WebContext,
	) -> StrategyFuture<'a, ()> {
		Box::pin(async move {
			let user = credentials
				.expose()
				.strip_prefix("ST-")
				.ok_or_else(|| CredentialsError::invalid("ticket not issued by this server"))?;
			let id = ProfileId::new(user).map_err(|e| {
				Error::technical_with_source("Ticket user is not a valid profile id.", e)
			})?;
			let client = ClientName::new(CAS_CLIENT).map_err(ConfigError::from)?;
			let profile = UserProfile::for_client(id, client)
				.with_attribute("email", format!("{user}@example.com"));

			credentials.set_user_profile(profile);

			Ok(())
		})
	}

	fn capabilities(&self) -> &[AuthenticatorCapability] {
		&[AuthenticatorCapability::Ticket]
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let name = ClientName::new(CAS_CLIENT)?;
	let pipeline = AuthPipeline::<TokenCredentials>::builder()
		.redirect_action_builder(Arc::new(
			UrlRedirectActionBuilder::new(
				"https://cas.example.com/login",
				"https://app.example.com/callback",
			)?
			.with_client_name(name.clone()),
		))
		.credentials_extractor(Arc::new(ParameterExtractor::new("ticket")))
		.authenticator(Arc::new(LocalCachingAuthenticator::<TokenCredentials>::new(
			Arc::new(DemoTicketValidator),
			Duration::minutes(5),
		)))
		.profile_creator(Arc::new(AuthenticatorProfileCreator))
		.build()?;
	let client = Arc::new(
		IndirectClient::new(name, pipeline)
			.require_authenticator_capabilities(&[AuthenticatorCapability::Ticket])?,
	);
	let clients = Clients::new([client.clone() as Arc<dyn Client>])?;
	let redirect = client.redirect_action(&MemoryWebContext::new()).await?;

	println!("Login redirect: {redirect}.");

	let session = Arc::new(MemorySessionStore::new());
	let return_request = MemoryWebContext::new()
		.with_session_store(session.clone())
		.with_parameter("client_name", CAS_CLIENT)
		.with_parameter("ticket", "ST-jdoe");
	let response = CallbackLogic::new()
		.perform(
			&return_request,
			&clients,
			&PlainResponseAdapter,
			&CallbackOptions::default().with_default_url("/dashboard"),
		)
		.await?;

	println!("Callback response: {response:?}.");

	let next_request = MemoryWebContext::new().with_session_store(session);
	let profile = ProfileManager::new(&next_request).get(true).await?;

	println!("Authenticated profile on the next request: {profile:?}.");

	Ok(())
}
