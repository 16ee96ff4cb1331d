//! Strategy hooks composed by indirect clients.
//!
//! Each trait exposes exactly one operation plus, for authenticators, the declared
//! capability set and decorator accessor used by setup-time checks. Implementations are
//! chosen at configuration time and are required to be `Send + Sync`.

// self
use crate::{
	_prelude::*,
	action::RedirectAction,
	client::Credentials,
	context::WebContext,
	profile::UserProfile,
};

/// Boxed future returned by strategy operations.
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Builds the redirect sending the user agent to the identity provider.
///
/// Failing with [`Error::Action`] asks the host to answer with another protocol action
/// instead (e.g. a `401` when the provider cannot be reached interactively).
pub trait RedirectActionBuilder
where
	Self: Send + Sync,
{
	/// Computes the redirect for the current request.
	fn redirect<'a>(&'a self, context: &'a dyn WebContext) -> StrategyFuture<'a, RedirectAction>;
}

/// Reads credentials from a return request; `None` means the request carries none.
pub trait CredentialsExtractor<C>
where
	Self: Send + Sync,
	C: Credentials,
{
	/// Extracts credentials from the current request.
	fn extract<'a>(&'a self, context: &'a dyn WebContext) -> StrategyFuture<'a, Option<C>>;
}

/// Capabilities an authenticator declares so clients can check compatibility at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthenticatorCapability {
	/// Validates opaque tokens (authorization codes, access tokens).
	Token,
	/// Validates username/password pairs.
	UsernamePassword,
	/// Validates service tickets issued by a central authentication server.
	Ticket,
	/// Validates signed assertions (SAML responses, JWTs).
	Assertion,
	/// Provider-specific capability.
	Custom(&'static str),
}
impl AuthenticatorCapability {
	/// Returns a stable label for logs and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthenticatorCapability::Token => "token",
			AuthenticatorCapability::UsernamePassword => "username_password",
			AuthenticatorCapability::Ticket => "ticket",
			AuthenticatorCapability::Assertion => "assertion",
			AuthenticatorCapability::Custom(label) => label,
		}
	}
}
impl Display for AuthenticatorCapability {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Validates extracted credentials.
///
/// Rejections must use [`Error::Credentials`]; the pipeline treats them as an anonymous
/// request. Any other error is a genuine fault and propagates.
pub trait Authenticator<C>
where
	Self: Send + Sync,
	C: Credentials,
{
	/// Validates the credentials, optionally attaching the resolved profile to them.
	fn validate<'a>(
		&'a self,
		credentials: &'a mut C,
		context: &'a dyn WebContext,
	) -> StrategyFuture<'a, ()>;

	/// Capabilities this authenticator supports.
	fn capabilities(&self) -> &[AuthenticatorCapability] {
		&[]
	}

	/// Wrapped authenticator when this one is a delegating decorator.
	fn delegate(&self) -> Option<&dyn Authenticator<C>> {
		None
	}

	/// One-time initialization, run when the pipeline is built.
	fn init(&self) -> Result<()> {
		Ok(())
	}

	/// Name used in logs and configuration errors.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}
}

/// Turns validated credentials into a profile.
pub trait ProfileCreator<C>
where
	Self: Send + Sync,
	C: Credentials,
{
	/// Creates the profile for the validated credentials.
	fn create<'a>(
		&'a self,
		credentials: &'a C,
		context: &'a dyn WebContext,
	) -> StrategyFuture<'a, UserProfile>;
}

/// Builds the provider-specific central-logout redirect for a profile.
pub trait LogoutActionBuilder
where
	Self: Send + Sync,
{
	/// Returns the logout redirect, or `None` when the provider has nothing to do.
	fn logout_action<'a>(
		&'a self,
		context: &'a dyn WebContext,
		profile: &'a UserProfile,
		target_url: Option<&'a str>,
	) -> StrategyFuture<'a, Option<RedirectAction>>;
}
