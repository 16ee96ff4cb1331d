//! Crate-level error types shared across clients, engines, and session stores.

// self
use crate::{
	_prelude::*,
	action::HttpAction,
	client::AuthenticatorCapability,
	profile::IdentifierError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Setup or deployment problem; never converted into a response.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credentials were extracted but failed validation.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// Session-layer failure.
	#[error("{0}")]
	Session(
		#[from]
		#[source]
		crate::session::SessionError,
	),

	/// Control-flow signal asking the host to answer with the carried action.
	#[error("Request requires the HTTP action `{0}`.")]
	Action(HttpAction),
	/// Any other runtime failure raised by a strategy or the engines.
	#[error("{message}")]
	Technical {
		/// Human-readable description.
		message: String,
		/// Underlying failure, when available.
		#[source]
		source: Option<BoxError>,
	},
}
impl Error {
	/// Builds a [`Error::Technical`] without an underlying source.
	pub fn technical(message: impl Into<String>) -> Self {
		Self::Technical { message: message.into(), source: None }
	}

	/// Builds a [`Error::Technical`] wrapping an underlying failure.
	pub fn technical_with_source(
		message: impl Into<String>,
		src: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self::Technical { message: message.into(), source: Some(Box::new(src)) }
	}

	/// Returns true for configuration faults that must stop the request loudly.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Config(_))
	}
}
impl From<HttpAction> for Error {
	fn from(action: HttpAction) -> Self {
		Self::Action(action)
	}
}

/// Configuration and setup failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required pipeline strategy was never assigned.
	#[error("The `{strategy}` strategy must be configured.")]
	MissingStrategy {
		/// Strategy slot name.
		strategy: &'static str,
	},
	/// The configured authenticator does not declare a required capability.
	#[error("Unsupported authenticator `{authenticator}`: missing the {capability} capability.")]
	UnsupportedAuthenticator {
		/// Name reported by the (unwrapped) authenticator.
		authenticator: String,
		/// Capability that was required but not declared.
		capability: AuthenticatorCapability,
	},
	/// Authenticator one-time initialization failed.
	#[error("Authenticator `{authenticator}` failed to initialize.")]
	AuthenticatorInit {
		/// Name reported by the authenticator.
		authenticator: String,
		/// Underlying initialization failure.
		#[source]
		source: BoxError,
	},
	/// The logout URL pattern resolved to an empty string.
	#[error("The logout URL pattern cannot be blank.")]
	BlankLogoutUrlPattern,
	/// The logout URL pattern is not a valid regular expression.
	#[error("The logout URL pattern `{pattern}` is invalid.")]
	InvalidLogoutUrlPattern {
		/// Pattern as supplied.
		pattern: String,
		/// Underlying compilation failure.
		#[source]
		source: regex::Error,
	},
	/// Two clients share the same name.
	#[error("Client `{name}` is registered more than once.")]
	DuplicateClient {
		/// Conflicting client name.
		name: String,
	},
	/// A client referenced by configuration is not registered.
	#[error("Client `{name}` is not registered.")]
	UnknownClient {
		/// Missing client name.
		name: String,
	},
	/// A provider URL supplied to a built-in strategy is invalid.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Which setting failed validation.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
}
impl ConfigError {
	/// Wraps an authenticator's initialization failure inside [`ConfigError`].
	pub fn authenticator_init(
		authenticator: impl Into<String>,
		src: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self::AuthenticatorInit { authenticator: authenticator.into(), source: Box::new(src) }
	}
}

/// Credential validation failures; recovered by the pipeline as "no credentials".
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialsError {
	/// The authenticator rejected the credentials.
	#[error("Credentials are invalid: {reason}.")]
	Invalid {
		/// Authenticator-supplied reason string.
		reason: String,
	},
	/// The credentials were valid once but have expired.
	#[error("Credentials have expired.")]
	Expired,
}
impl CredentialsError {
	/// Convenience constructor for [`CredentialsError::Invalid`].
	pub fn invalid(reason: impl Into<String>) -> Self {
		Self::Invalid { reason: reason.into() }
	}
}
