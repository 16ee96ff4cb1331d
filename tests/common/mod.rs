#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use parking_lot::Mutex;
// self
use sso_broker::{
	action::RedirectAction,
	client::{Client, ClientFuture, Clients},
	context::{MemoryWebContext, WebContext},
	profile::{ClientName, ProfileId, UserProfile},
	session::{MemorySessionStore, SessionStore},
};

/// Client double that answers central logout with a fixed action and counts the calls.
pub struct LogoutRecordingClient {
	name: ClientName,
	logout_location: Option<String>,
	logout_calls: AtomicUsize,
	last_target: Mutex<Option<Option<String>>>,
}
impl LogoutRecordingClient {
	pub fn new(name: &str, logout_location: Option<&str>) -> Arc<Self> {
		Arc::new(Self {
			name: client_name(name),
			logout_location: logout_location.map(ToOwned::to_owned),
			logout_calls: AtomicUsize::new(0),
			last_target: Default::default(),
		})
	}

	pub fn logout_calls(&self) -> usize {
		self.logout_calls.load(Ordering::SeqCst)
	}

	/// Target URL passed to the last logout call; `None` when never called.
	pub fn last_target(&self) -> Option<Option<String>> {
		self.last_target.lock().clone()
	}
}
impl Client for LogoutRecordingClient {
	fn name(&self) -> &ClientName {
		&self.name
	}

	fn redirect_action<'a>(
		&'a self,
		_context: &'a dyn WebContext,
	) -> ClientFuture<'a, RedirectAction> {
		Box::pin(async move {
			Ok(RedirectAction::found(format!("https://idp.example.com/{}/login", self.name)))
		})
	}

	fn user_profile<'a>(
		&'a self,
		_context: &'a dyn WebContext,
	) -> ClientFuture<'a, Option<UserProfile>> {
		Box::pin(async { Ok(None) })
	}

	fn logout_action<'a>(
		&'a self,
		_context: &'a dyn WebContext,
		_profile: &'a UserProfile,
		target_url: Option<&'a str>,
	) -> ClientFuture<'a, Option<RedirectAction>> {
		Box::pin(async move {
			self.logout_calls.fetch_add(1, Ordering::SeqCst);
			*self.last_target.lock() = Some(target_url.map(ToOwned::to_owned));

			Ok(self.logout_location.as_deref().map(RedirectAction::found))
		})
	}
}

pub fn client_name(name: &str) -> ClientName {
	ClientName::new(name).expect("Client name fixture should be valid.")
}

pub fn profile(id: &str, client: &str) -> UserProfile {
	UserProfile::for_client(
		ProfileId::new(id).expect("Profile id fixture should be valid."),
		client_name(client),
	)
}

pub fn as_client(client: &Arc<LogoutRecordingClient>) -> Arc<dyn Client> {
	client.clone()
}

pub fn registry(clients: Vec<Arc<dyn Client>>) -> Clients {
	Clients::new(clients).expect("Client fixtures should have distinct names.")
}

/// Session holding `profiles`, plus a context bound to it.
pub async fn session_with(profiles: Vec<UserProfile>) -> (MemorySessionStore, MemoryWebContext) {
	let store = MemorySessionStore::new();

	store.save_profiles(profiles).await.expect("Seeding the session should succeed.");

	let context = MemoryWebContext::new().with_session_store(Arc::new(store.clone()));

	(store, context)
}
