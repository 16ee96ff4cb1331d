//! Request context abstraction consumed by clients and engines.

// self
use crate::{_prelude::*, session::SessionStore};

/// Read-only view of the current request plus its session store.
///
/// Web-framework adapters implement this on a thin wrapper around their request type.
/// The session store is per request; engines never cache it.
pub trait WebContext
where
	Self: Send + Sync,
{
	/// Returns the named query/form parameter, if present.
	fn request_parameter(&self, name: &str) -> Option<String>;

	/// HTTP method of the current request.
	fn request_method(&self) -> Method {
		Method::GET
	}

	/// Session store bound to the current request, if the host provides one.
	fn session_store(&self) -> Option<Arc<dyn SessionStore>>;
}

/// In-memory [`WebContext`] for tests, demos, and non-HTTP hosts.
#[derive(Clone, Default)]
pub struct MemoryWebContext {
	parameters: HashMap<String, String>,
	method: Method,
	session_store: Option<Arc<dyn SessionStore>>,
}
impl MemoryWebContext {
	/// Creates a GET context with no parameters and no session store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a request parameter.
	pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parameters.insert(name.into(), value.into());

		self
	}

	/// Overrides the request method.
	pub fn with_method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Attaches a session store.
	pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
		self.session_store = Some(store);

		self
	}
}
impl WebContext for MemoryWebContext {
	fn request_parameter(&self, name: &str) -> Option<String> {
		self.parameters.get(name).cloned()
	}

	fn request_method(&self) -> Method {
		self.method.clone()
	}

	fn session_store(&self) -> Option<Arc<dyn SessionStore>> {
		self.session_store.clone()
	}
}
impl Debug for MemoryWebContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryWebContext")
			.field("parameters", &self.parameters)
			.field("method", &self.method)
			.field("session_store_set", &self.session_store.is_some())
			.finish()
	}
}
