//! Thread-safe in-memory [`SessionStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	profile::UserProfile,
	session::{SessionError, SessionFuture, SessionStore},
};

#[derive(Debug, Default)]
struct SessionState {
	// Profiles are kept as a JSON blob, the way serializing session backends hold them.
	profiles: Option<String>,
	destroyed: bool,
}

type SessionCell = Arc<RwLock<SessionState>>;

/// Single in-memory session; clones share the same state.
#[derive(Clone, Debug)]
pub struct MemorySessionStore {
	state: SessionCell,
	destroy_supported: bool,
}
impl MemorySessionStore {
	/// Creates an empty session that supports destruction.
	pub fn new() -> Self {
		Self { state: Default::default(), destroy_supported: true }
	}

	/// Creates an empty session whose backend reports destruction as unsupported.
	pub fn without_destroy() -> Self {
		Self { destroy_supported: false, ..Self::new() }
	}

	/// Returns true once [`SessionStore::destroy_session`] has succeeded.
	pub fn is_destroyed(&self) -> bool {
		self.state.read().destroyed
	}

	/// Returns true while the session holds at least one profile.
	pub fn has_profiles(&self) -> bool {
		self.state.read().profiles.is_some()
	}

	fn load_now(state: SessionCell) -> Result<Vec<UserProfile>, SessionError> {
		match state.read().profiles.as_deref() {
			Some(blob) => Ok(serde_json::from_str(blob)?),
			None => Ok(Vec::new()),
		}
	}

	fn save_now(state: SessionCell, profiles: Vec<UserProfile>) -> Result<(), SessionError> {
		let blob = if profiles.is_empty() { None } else { Some(serde_json::to_string(&profiles)?) };
		let mut guard = state.write();

		guard.profiles = blob;
		guard.destroyed = false;

		Ok(())
	}

	fn destroy_now(state: SessionCell) -> bool {
		let mut guard = state.write();

		guard.profiles = None;
		guard.destroyed = true;

		true
	}
}
impl Default for MemorySessionStore {
	fn default() -> Self {
		Self::new()
	}
}
impl SessionStore for MemorySessionStore {
	fn load_profiles(&self) -> SessionFuture<'_, Vec<UserProfile>> {
		let state = self.state.clone();

		Box::pin(async move { Self::load_now(state) })
	}

	fn save_profiles(&self, profiles: Vec<UserProfile>) -> SessionFuture<'_, ()> {
		let state = self.state.clone();

		Box::pin(async move { Self::save_now(state, profiles) })
	}

	fn remove_profiles(&self) -> SessionFuture<'_, ()> {
		let state = self.state.clone();

		Box::pin(async move {
			state.write().profiles = None;

			Ok(())
		})
	}

	fn destroy_session(&self) -> SessionFuture<'_, bool> {
		if !self.destroy_supported {
			return Box::pin(async { Ok(false) });
		}

		let state = self.state.clone();

		Box::pin(async move { Ok(Self::destroy_now(state)) })
	}
}
