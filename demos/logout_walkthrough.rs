//! Shows the logout engine's decisions: open-redirect filtering, forced local logout for
//! multi-provider sessions, and central logout at the first provider that offers it.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use sso_broker::{
	action::PlainResponseAdapter,
	client::{
		AuthPipeline, Authenticator, AuthenticatorProfileCreator, Client, Clients, IndirectClient,
		ParameterExtractor, StrategyFuture, TokenCredentials, UrlLogoutActionBuilder,
		UrlRedirectActionBuilder,
	},
	context::{MemoryWebContext, WebContext},
	engine::{LogoutLogic, LogoutOptions},
	profile::{ClientName, ProfileId, UserProfile},
	session::{MemorySessionStore, SessionStore},
};

/// Logout only needs redirect and logout builders; validation is never reached.
struct NoopAuthenticator;
impl Authenticator<TokenCredentials> for NoopAuthenticator {
	fn validate<'a>(
		&'a self,
		_credentials: &'a mut TokenCredentials,
		_context: &'a dyn WebContext,
	) -> StrategyFuture<'a, ()> {
		Box::pin(async { Ok(()) })
	}
}

fn oidc_client(name: &str, base: &str, central_logout: bool) -> Result<Arc<dyn Client>> {
	let name = ClientName::new(name)?;
	let pipeline = AuthPipeline::<TokenCredentials>::builder()
		.redirect_action_builder(Arc::new(
			UrlRedirectActionBuilder::new(
				&format!("{base}/authorize"),
				"https://app.example.com/callback",
			)?
			.with_callback_parameter("redirect_uri")
			.with_client_name(name.clone()),
		))
		.credentials_extractor(Arc::new(ParameterExtractor::new("code")))
		.authenticator(Arc::new(NoopAuthenticator))
		.profile_creator(Arc::new(AuthenticatorProfileCreator))
		.build()?;
	let mut client = IndirectClient::new(name, pipeline);

	if central_logout {
		client = client.with_logout_action_builder(Arc::new(
			UrlLogoutActionBuilder::new(&format!("{base}/end-session"))?
				.with_redirect_parameter("post_logout_redirect_uri")
				.with_profile_hint("id_token_hint", "id_token"),
		));
	}

	Ok(Arc::new(client))
}

fn profile(id: &str, client: &str) -> Result<UserProfile> {
	Ok(UserProfile::for_client(ProfileId::new(id)?, ClientName::new(client)?)
		.with_attribute("id_token", format!("token-for-{id}")))
}

fn signed_in_twice() -> Result<Vec<UserProfile>> {
	Ok(vec![profile("jdoe", "LegacyClient")?, profile("jdoe", "OidcClient")?])
}

async fn run(
	label: &str,
	clients: &Clients,
	request: MemoryWebContext,
	options: &LogoutOptions,
) -> Result<()> {
	let response =
		LogoutLogic::new().perform(&request, clients, &PlainResponseAdapter, options).await?;

	println!("{label}: {} {:?}", response.status, response.location);

	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let clients = Clients::new([
		oidc_client("LegacyClient", "https://legacy.example.com", false)?,
		oidc_client("OidcClient", "https://idp.example.com", true)?,
	])?;
	let session = MemorySessionStore::new();

	session.save_profiles(signed_in_twice()?).await?;

	let request = |url: &str| {
		MemoryWebContext::new()
			.with_session_store(Arc::new(session.clone()))
			.with_parameter("url", url)
	};

	run(
		"Off-site target falls back to the default",
		&clients,
		request("https://evil.example.com"),
		&LogoutOptions::new().with_default_url("/goodbye").with_local_logout(false),
	)
	.await?;

	println!("Profiles left after forced local logout: {}", session.has_profiles());

	session.save_profiles(signed_in_twice()?).await?;

	run(
		"Central logout",
		&clients,
		request("https://app.example.com/bye"),
		&LogoutOptions::new()
			.with_logout_url_pattern(r"https://app\.example\.com/.*")
			.with_central_logout(true),
	)
	.await?;

	let bare = LogoutLogic::new()
		.perform(&MemoryWebContext::new(), &clients, &PlainResponseAdapter, &LogoutOptions::new())
		.await?;

	println!("Without a session or target URL: {}", bare.status);

	Ok(())
}
