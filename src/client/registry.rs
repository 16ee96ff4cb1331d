//! Client lookup used by engines.

// self
use crate::{_prelude::*, client::Client, error::ConfigError};

/// Resolves configured clients by name.
pub trait ClientRegistry
where
	Self: Send + Sync,
{
	/// Finds a client by name (trimmed, case-insensitive).
	fn find_client(&self, name: &str) -> Option<Arc<dyn Client>>;

	/// Client used when a request does not name one.
	fn default_client(&self) -> Option<Arc<dyn Client>> {
		None
	}
}

/// Ordered, immutable set of clients with unique names.
#[derive(Clone, Default)]
pub struct Clients {
	clients: Vec<Arc<dyn Client>>,
	default_client: Option<usize>,
}
impl Clients {
	/// Collects clients, rejecting names that collide case-insensitively.
	pub fn new<I>(clients: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = Arc<dyn Client>>,
	{
		let mut collected: Vec<Arc<dyn Client>> = Vec::new();

		for client in clients {
			if collected.iter().any(|existing| existing.name().matches(client.name())) {
				return Err(ConfigError::DuplicateClient { name: client.name().to_string() });
			}

			collected.push(client);
		}

		Ok(Self { clients: collected, default_client: None })
	}

	/// Marks the named client as the default.
	pub fn with_default_client(mut self, name: &str) -> Result<Self, ConfigError> {
		let index = self
			.position(name)
			.ok_or_else(|| ConfigError::UnknownClient { name: name.to_owned() })?;

		self.default_client = Some(index);

		Ok(self)
	}

	/// Client names in registration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.clients.iter().map(|client| &**client.name())
	}

	/// Number of clients.
	pub fn len(&self) -> usize {
		self.clients.len()
	}

	/// Returns true when no client is configured.
	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.clients.iter().position(|client| client.name().matches(name))
	}
}
impl ClientRegistry for Clients {
	fn find_client(&self, name: &str) -> Option<Arc<dyn Client>> {
		self.position(name).map(|index| self.clients[index].clone())
	}

	fn default_client(&self) -> Option<Arc<dyn Client>> {
		self.default_client.map(|index| self.clients[index].clone())
	}
}
impl Debug for Clients {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Clients")
			.field("names", &self.names().collect::<Vec<_>>())
			.field("default_client", &self.default_client.map(|index| self.clients[index].name()))
			.finish()
	}
}
