//! Validated names for clients and the users they authenticate.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

macro_rules! identifier {
	($(#[$meta:meta])* $name:ident => $kind:literal) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				Self::try_from(value.into())
			}

			/// Borrows the validated value.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				check($kind, &value).map(|()| Self(value))
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				self.as_str()
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.as_str()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({:?})", $kind, self.0)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 256;

/// Rejected client name or profile id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// `Client` or `Profile`.
		kind: &'static str,
	},
	/// The value starts or ends with whitespace.
	#[error("{kind} identifier `{value}` has surrounding whitespace.")]
	Padded {
		/// `Client` or `Profile`.
		kind: &'static str,
		/// Value as supplied.
		value: String,
	},
	/// The value is longer than [`IDENTIFIER_MAX_LEN`] bytes.
	#[error("{kind} identifier is {len} bytes long; at most {max} are allowed.")]
	TooLong {
		/// `Client` or `Profile`.
		kind: &'static str,
		/// Length of the rejected value.
		len: usize,
		/// Upper bound.
		max: usize,
	},
}

identifier! {
	/// Name a client is registered under; callbacks carry it in `client_name`.
	ClientName => "Client"
}
identifier! {
	/// Subject identifier issued by the provider (username, email, DN).
	ProfileId => "Profile"
}

impl ClientName {
	/// Compares names the way registries look clients up: trimmed and case-insensitive.
	pub fn matches(&self, name: &str) -> bool {
		self.0.eq_ignore_ascii_case(name.trim())
	}
}

// Subject identifiers (emails, DNs) may contain inner spaces.
fn check(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	if value.is_empty() {
		Err(IdentifierError::Empty { kind })
	} else if value.trim() != value {
		Err(IdentifierError::Padded { kind, value: value.to_owned() })
	} else if value.len() > IDENTIFIER_MAX_LEN {
		Err(IdentifierError::TooLong { kind, len: value.len(), max: IDENTIFIER_MAX_LEN })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_blank_and_padded_values() {
		assert!(ClientName::new("").is_err());
		assert!(ClientName::new(" saml").is_err(), "Leading whitespace must be rejected.");
		assert!(ProfileId::new("uid=jdoe ").is_err(), "Trailing whitespace must be rejected.");

		let id = ProfileId::new("cn=John Doe,dc=example").expect("Inner spaces should be allowed.");

		assert_eq!(id.as_str(), "cn=John Doe,dc=example");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let name: ClientName =
			serde_json::from_str("\"CasClient\"").expect("Client name should deserialize.");

		assert_eq!(name.as_str(), "CasClient");
		assert!(serde_json::from_str::<ClientName>("\"\"").is_err());
		assert!(serde_json::from_str::<ClientName>("\" CasClient\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		ClientName::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(ClientName::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn client_name_matching_ignores_case_and_padding() {
		let name = ClientName::new("OidcClient").expect("Client name fixture should be valid.");

		assert!(name.matches("oidcclient"));
		assert!(name.matches("  OIDCCLIENT "));
		assert!(!name.matches("SamlClient"));
	}

	#[test]
	fn errors_and_debug_name_the_identifier_kind() {
		let err = ProfileId::new(" jdoe").expect_err("Padded ids should be rejected.");

		assert_eq!(err, IdentifierError::Padded { kind: "Profile", value: " jdoe".into() });
		assert!(matches!(
			"".parse::<ClientName>(),
			Err(IdentifierError::Empty { kind: "Client" })
		));

		let name: ClientName = "CasClient".parse().expect("Client name should parse.");

		assert_eq!(format!("{name:?}"), "Client(\"CasClient\")");
		assert_eq!(name.as_str(), "CasClient");
	}
}
