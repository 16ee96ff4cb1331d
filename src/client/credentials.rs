//! Credential payloads extracted from provider return requests.

// self
use crate::{_prelude::*, profile::UserProfile};

/// Protocol-specific credentials flowing through an [`AuthPipeline`](crate::client::AuthPipeline).
///
/// Authenticators may attach the profile they resolved while validating, which
/// [`AuthenticatorProfileCreator`](crate::client::AuthenticatorProfileCreator) hands back
/// unchanged. Credentials that expose a [`cache_key`](Self::cache_key) can be cached by
/// [`LocalCachingAuthenticator`](crate::client::LocalCachingAuthenticator).
pub trait Credentials
where
	Self: 'static + Clone + Debug + Send + Sync,
{
	/// Stable value identifying these credentials for caching, if they are cacheable.
	fn cache_key(&self) -> Option<&str> {
		None
	}

	/// Profile attached by the authenticator, if any.
	fn user_profile(&self) -> Option<&UserProfile> {
		None
	}

	/// Attaches the profile resolved during validation.
	fn set_user_profile(&mut self, _profile: UserProfile) {}
}

/// Single opaque token (authorization code, ticket, assertion) read from the request.
#[derive(Clone, PartialEq)]
pub struct TokenCredentials {
	token: String,
	profile: Option<UserProfile>,
}
impl TokenCredentials {
	/// Wraps a raw token value.
	pub fn new(token: impl Into<String>) -> Self {
		Self { token: token.into(), profile: None }
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.token
	}
}
impl Credentials for TokenCredentials {
	fn cache_key(&self) -> Option<&str> {
		Some(&self.token)
	}

	fn user_profile(&self) -> Option<&UserProfile> {
		self.profile.as_ref()
	}

	fn set_user_profile(&mut self, profile: UserProfile) {
		self.profile = Some(profile);
	}
}
impl Debug for TokenCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCredentials")
			.field("token", &"<redacted>")
			.field("profile", &self.profile.as_ref().map(UserProfile::id))
			.finish()
	}
}
