//! Authenticated user profiles and the identifiers that tag them.

pub mod id;

pub use id::*;

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::_prelude::*;

/// Identity record materialized from validated credentials.
///
/// The originating client name is fixed at construction; there is no setter, so a
/// profile cannot be re-attributed to another provider after it has been created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	id: ProfileId,
	client_name: Option<ClientName>,
	#[serde(default)]
	attributes: BTreeMap<String, Value>,
	#[serde(default)]
	roles: BTreeSet<String>,
	#[serde(default)]
	remembered: bool,
}
impl UserProfile {
	/// Creates a profile that is not tied to any client.
	pub fn new(id: ProfileId) -> Self {
		Self {
			id,
			client_name: None,
			attributes: BTreeMap::new(),
			roles: BTreeSet::new(),
			remembered: false,
		}
	}

	/// Creates a profile produced by the named client.
	pub fn for_client(id: ProfileId, client_name: ClientName) -> Self {
		Self { client_name: Some(client_name), ..Self::new(id) }
	}

	/// Adds or replaces an attribute.
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(name.into(), value.into());

		self
	}

	/// Grants a role.
	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.roles.insert(role.into());

		self
	}

	/// Marks the profile as coming from a remember-me authentication.
	pub fn with_remembered(mut self, remembered: bool) -> Self {
		self.remembered = remembered;

		self
	}

	/// Provider-side identifier.
	pub fn id(&self) -> &ProfileId {
		&self.id
	}

	/// Name of the client that produced the profile.
	pub fn client_name(&self) -> Option<&ClientName> {
		self.client_name.as_ref()
	}

	/// Raw attribute value.
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Attribute decoded into a concrete type; `None` when missing or of another shape.
	pub fn attribute_as<T>(&self, name: &str) -> Option<T>
	where
		T: DeserializeOwned,
	{
		self.attributes.get(name).and_then(|value| T::deserialize(value).ok())
	}

	/// All attributes.
	pub fn attributes(&self) -> &BTreeMap<String, Value> {
		&self.attributes
	}

	/// Granted roles.
	pub fn roles(&self) -> &BTreeSet<String> {
		&self.roles
	}

	/// Whether the profile came from a remember-me authentication.
	pub fn is_remembered(&self) -> bool {
		self.remembered
	}

	/// Returns true when the profile was produced by `client` (same registry matching rules).
	pub fn is_from(&self, client: &str) -> bool {
		self.client_name.as_ref().is_some_and(|name| name.matches(client))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn profile() -> UserProfile {
		UserProfile::for_client(
			ProfileId::new("jdoe").expect("Profile id fixture should be valid."),
			ClientName::new("CasClient").expect("Client name fixture should be valid."),
		)
	}

	#[test]
	fn typed_attributes_decode_or_fall_back_to_none() {
		let profile = profile().with_attribute("email", "jdoe@example.com").with_attribute("age", 42);

		assert_eq!(profile.attribute_as::<String>("email").as_deref(), Some("jdoe@example.com"));
		assert_eq!(profile.attribute_as::<u32>("age"), Some(42));
		assert_eq!(profile.attribute_as::<u32>("email"), None);
		assert!(profile.attribute("missing").is_none());
	}

	#[test]
	fn client_tag_survives_serialization() {
		let profile = profile().with_role("admin").with_remembered(true);
		let payload = serde_json::to_string(&profile).expect("Profile should serialize to JSON.");
		let decoded: UserProfile =
			serde_json::from_str(&payload).expect("Profile should deserialize from JSON.");

		assert_eq!(decoded, profile);
		assert!(decoded.is_from("casclient"));
		assert!(decoded.roles().contains("admin"));
		assert!(decoded.is_remembered());
	}

	#[test]
	fn untagged_profile_matches_no_client() {
		let profile = UserProfile::new(ProfileId::new("anon").expect("Profile id should be valid."));

		assert!(profile.client_name().is_none());
		assert!(!profile.is_from("CasClient"));
	}
}
