//! Per-request profile manager combining request-scoped profiles with the session store.

// self
use crate::{_prelude::*, context::WebContext, profile::UserProfile, session::SessionStore};

/// Request-scoped view over the authenticated profiles of the current user.
///
/// Profiles saved during the request are visible immediately even when they are not
/// written to the session. Entries are keyed by client name: saving a profile from a
/// client that already has one replaces it in place, keeping the original order.
pub struct ProfileManager {
	store: Option<Arc<dyn SessionStore>>,
	request_profiles: Mutex<Vec<UserProfile>>,
}
impl ProfileManager {
	/// Creates a manager bound to the context's session store.
	pub fn new(context: &dyn WebContext) -> Self {
		Self { store: context.session_store(), request_profiles: Mutex::new(Vec::new()) }
	}

	/// Session store backing this manager, if the host provides one.
	pub fn session_store(&self) -> Option<&Arc<dyn SessionStore>> {
		self.store.as_ref()
	}

	/// Returns every profile, reading the session too when `read_from_session` is set.
	pub async fn get_all(&self, read_from_session: bool) -> Result<Vec<UserProfile>> {
		let mut profiles = match (&self.store, read_from_session) {
			(Some(store), true) => store.load_profiles().await?,
			_ => Vec::new(),
		};
		let request_profiles = self.request_profiles.lock().clone();

		for profile in request_profiles {
			upsert(&mut profiles, profile);
		}

		Ok(profiles)
	}

	/// Returns the first profile, if any.
	pub async fn get(&self, read_from_session: bool) -> Result<Option<UserProfile>> {
		Ok(self.get_all(read_from_session).await?.into_iter().next())
	}

	/// Returns true when at least one profile is available.
	pub async fn is_authenticated(&self, read_from_session: bool) -> Result<bool> {
		Ok(!self.get_all(read_from_session).await?.is_empty())
	}

	/// Saves a profile for the current request and, when `save_in_session` is set, the
	/// session. Without `multi_profile`, previously saved profiles are dropped.
	pub async fn save(
		&self,
		profile: UserProfile,
		save_in_session: bool,
		multi_profile: bool,
	) -> Result<()> {
		let mut profiles =
			if multi_profile { self.get_all(save_in_session).await? } else { Vec::new() };

		upsert(&mut profiles, profile);

		if save_in_session {
			match &self.store {
				Some(store) => store.save_profiles(profiles.clone()).await?,
				None => tracing::warn!(
					"No session store is available; the profile only lives for this request."
				),
			}
		}

		*self.request_profiles.lock() = profiles;

		Ok(())
	}

	/// Removes every profile from the request and the session.
	pub async fn logout(&self) -> Result<()> {
		self.request_profiles.lock().clear();

		if let Some(store) = &self.store {
			store.remove_profiles().await?;
		}

		Ok(())
	}
}
impl Debug for ProfileManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileManager")
			.field("session_store_set", &self.store.is_some())
			.field("request_profiles", &self.request_profiles.lock().len())
			.finish()
	}
}

fn upsert(profiles: &mut Vec<UserProfile>, profile: UserProfile) {
	let position = profiles.iter().position(|existing| {
		match (existing.client_name(), profile.client_name()) {
			(Some(existing), Some(name)) => existing.matches(name),
			(existing, name) => existing.is_none() && name.is_none(),
		}
	});

	match position {
		Some(index) => profiles[index] = profile,
		None => profiles.push(profile),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		context::MemoryWebContext,
		profile::{ClientName, ProfileId},
		session::MemorySessionStore,
	};

	fn profile(id: &str, client: &str) -> UserProfile {
		UserProfile::for_client(
			ProfileId::new(id).expect("Profile id fixture should be valid."),
			ClientName::new(client).expect("Client name fixture should be valid."),
		)
	}

	fn context_with(store: &MemorySessionStore) -> MemoryWebContext {
		MemoryWebContext::new().with_session_store(Arc::new(store.clone()))
	}

	#[tokio::test]
	async fn save_replaces_previous_profiles_without_multi_profile() {
		let store = MemorySessionStore::new();
		let context = context_with(&store);
		let manager = ProfileManager::new(&context);

		manager.save(profile("a", "CasClient"), true, false).await.expect("First save should work.");
		manager.save(profile("b", "OidcClient"), true, false).await.expect("Second save should work.");

		let profiles = manager.get_all(true).await.expect("Profiles should load.");

		assert_eq!(profiles.len(), 1);
		assert_eq!(profiles[0].id().to_string(), "b");
	}

	#[tokio::test]
	async fn multi_profile_keeps_one_entry_per_client_in_order() {
		let store = MemorySessionStore::new();
		let context = context_with(&store);
		let manager = ProfileManager::new(&context);

		for (id, client) in [("a", "CasClient"), ("b", "OidcClient"), ("c", "CasClient")] {
			manager.save(profile(id, client), true, true).await.expect("Save should work.");
		}

		let fresh = ProfileManager::new(&context);
		let ids = fresh
			.get_all(true)
			.await
			.expect("Profiles should load from the session.")
			.into_iter()
			.map(|profile| profile.id().to_string())
			.collect::<Vec<_>>();

		assert_eq!(ids, ["c", "b"]);
	}

	#[tokio::test]
	async fn client_names_differing_in_case_share_one_entry() {
		let store = MemorySessionStore::new();
		let context = context_with(&store);
		let manager = ProfileManager::new(&context);

		manager.save(profile("a", "CasClient"), true, true).await.expect("Save should work.");
		manager.save(profile("b", "casclient"), true, true).await.expect("Save should work.");

		let profiles = store.load_profiles().await.expect("Profiles should load.");

		assert_eq!(profiles.len(), 1);
		assert_eq!(profiles[0].id().to_string(), "b");
	}

	#[tokio::test]
	async fn request_profiles_are_visible_without_session() {
		let store = MemorySessionStore::new();
		let context = context_with(&store);
		let manager = ProfileManager::new(&context);

		manager.save(profile("a", "CasClient"), false, false).await.expect("Save should work.");

		assert!(manager.is_authenticated(false).await.expect("Lookup should work."));
		assert!(!store.has_profiles());
		assert!(
			!ProfileManager::new(&context)
				.is_authenticated(true)
				.await
				.expect("Lookup should work.")
		);
	}

	#[tokio::test]
	async fn logout_clears_request_and_session() {
		let store = MemorySessionStore::new();
		let context = context_with(&store);
		let manager = ProfileManager::new(&context);

		manager.save(profile("a", "CasClient"), true, false).await.expect("Save should work.");
		manager.logout().await.expect("Logout should work.");

		assert!(manager.get(true).await.expect("Lookup should work.").is_none());
		assert!(!store.has_profiles());
		assert!(!store.is_destroyed());
	}

	#[tokio::test]
	async fn save_without_store_keeps_request_profile() {
		let context = MemoryWebContext::new();
		let manager = ProfileManager::new(&context);

		manager
			.save(profile("a", "CasClient"), true, false)
			.await
			.expect("Saving without a store should degrade to request scope.");

		assert_eq!(manager.get_all(true).await.expect("Lookup should work.").len(), 1);
	}
}
