//! Indirect clients: per-provider strategy bundles (redirect, extract, validate, create)
//! and the registry engines use to find them by name.
//!
//! `strategy` defines the pluggable traits, `builtin` ships framework-neutral
//! implementations, `caching` decorates authenticators with a local cache, `pipeline`
//! composes the four strategies, and `indirect` binds a pipeline to a client name behind
//! the object-safe [`Client`] trait.

pub mod builtin;
pub mod caching;
pub mod credentials;
pub mod indirect;
pub mod pipeline;
pub mod registry;
pub mod strategy;

pub use builtin::*;
pub use caching::*;
pub use credentials::*;
pub use indirect::*;
pub use pipeline::*;
pub use registry::*;
pub use strategy::*;

// self
use crate::{
	_prelude::*,
	action::RedirectAction,
	context::WebContext,
	profile::{ClientName, UserProfile},
};

/// Boxed future returned by [`Client`] operations.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Object-safe view of a configured identity-provider client.
///
/// Engines only see clients through this trait so registries can mix clients that use
/// different credential types.
pub trait Client
where
	Self: Send + Sync,
{
	/// Unique client name; profiles produced by the client carry it.
	fn name(&self) -> &ClientName;

	/// Builds the redirect that sends the user agent to the identity provider.
	fn redirect_action<'a>(
		&'a self,
		context: &'a dyn WebContext,
	) -> ClientFuture<'a, RedirectAction>;

	/// Extracts and validates credentials from the return request and turns them into a
	/// profile; `None` means the request stays anonymous.
	fn user_profile<'a>(&'a self, context: &'a dyn WebContext)
	-> ClientFuture<'a, Option<UserProfile>>;

	/// Asks the provider for a central-logout action; `None` declines.
	///
	/// `target_url` is either absent or an absolute `http(s)` URL the provider may send the
	/// user agent back to once its own session is closed.
	fn logout_action<'a>(
		&'a self,
		_context: &'a dyn WebContext,
		_profile: &'a UserProfile,
		_target_url: Option<&'a str>,
	) -> ClientFuture<'a, Option<RedirectAction>> {
		Box::pin(async { Ok(None) })
	}
}
