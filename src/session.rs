//! Session storage contract, the in-memory backend, and the per-request profile manager.

pub mod manager;
pub mod memory;

pub use manager::ProfileManager;
pub use memory::MemorySessionStore;

// self
use crate::{_prelude::*, profile::UserProfile};

/// Boxed future returned by [`SessionStore`] operations.
pub type SessionFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SessionError>> + 'a + Send>>;

/// Session backend holding the profiles of the current web session.
///
/// Profiles are kept in insertion order, at most one per client name; the
/// [`ProfileManager`] enforces that keying before calling [`save_profiles`](Self::save_profiles).
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads every profile stored in the session.
	fn load_profiles(&self) -> SessionFuture<'_, Vec<UserProfile>>;

	/// Replaces the stored profiles.
	fn save_profiles(&self, profiles: Vec<UserProfile>) -> SessionFuture<'_, ()>;

	/// Removes every stored profile, keeping the session itself alive.
	fn remove_profiles(&self) -> SessionFuture<'_, ()>;

	/// Destroys the whole session.
	///
	/// Returns `Ok(false)` when the backend cannot destroy sessions; that case is never
	/// reported as an error.
	fn destroy_session(&self) -> SessionFuture<'_, bool> {
		Box::pin(async { Ok(false) })
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SessionError {
	/// Stored profiles could not be encoded or decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl From<serde_json::Error> for SessionError {
	fn from(e: serde_json::Error) -> Self {
		Self::Serialization { message: e.to_string() }
	}
}
