//! Protocol actions produced by clients and engines, plus the adapter contract that turns
//! them into host responses.
//!
//! Every redirect or logout invocation yields exactly one [`HttpAction`]. Hosts implement
//! [`HttpActionAdapter`] to convert that action (or a handled [`Error`]) into their own
//! response type; [`PlainResponseAdapter`] is a framework-neutral implementation.

// self
use crate::{_prelude::*, context::WebContext};

/// Redirect-or-blank outcome of a redirect builder, a logout action builder, or the
/// post-logout computation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedirectAction {
	/// `302 Found` redirect.
	Found {
		/// Target location (absolute or relative).
		location: String,
	},
	/// `303 See Other` redirect, used after non-GET requests.
	SeeOther {
		/// Target location (absolute or relative).
		location: String,
	},
	/// `204 No Content` blank page.
	NoContent,
}
impl RedirectAction {
	/// Builds a `302 Found` redirect.
	pub fn found(location: impl Into<String>) -> Self {
		Self::Found { location: location.into() }
	}

	/// Builds a `303 See Other` redirect.
	pub fn see_other(location: impl Into<String>) -> Self {
		Self::SeeOther { location: location.into() }
	}

	/// Builds the redirect matching the request method: `302` for GET/HEAD, `303` otherwise.
	pub fn redirect_for(context: &dyn WebContext, location: impl Into<String>) -> Self {
		let method = context.request_method();

		if method == Method::GET || method == Method::HEAD {
			Self::found(location)
		} else {
			Self::see_other(location)
		}
	}

	/// Returns the redirect target, if any.
	pub fn location(&self) -> Option<&str> {
		match self {
			Self::Found { location } | Self::SeeOther { location } => Some(location),
			Self::NoContent => None,
		}
	}

	/// HTTP status code of the action.
	pub const fn status_code(&self) -> u16 {
		match self {
			Self::Found { .. } => 302,
			Self::SeeOther { .. } => 303,
			Self::NoContent => 204,
		}
	}
}
impl Display for RedirectAction {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.location() {
			Some(location) => write!(f, "{} -> {location}", self.status_code()),
			None => write!(f, "{}", self.status_code()),
		}
	}
}

/// Any protocol action the host must answer with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HttpAction {
	/// Redirect or blank page.
	Redirect {
		/// Wrapped redirect action.
		action: RedirectAction,
	},
	/// `200 OK` with an inline body (e.g. an auto-submitting form).
	Ok {
		/// Response body.
		content: String,
	},
	/// `400 Bad Request`.
	BadRequest,
	/// `401 Unauthorized`.
	Unauthorized,
	/// `403 Forbidden`.
	Forbidden,
	/// Any other status without a body.
	Status {
		/// HTTP status code.
		code: u16,
	},
}
impl HttpAction {
	/// HTTP status code of the action.
	pub const fn status_code(&self) -> u16 {
		match self {
			Self::Redirect { action } => action.status_code(),
			Self::Ok { .. } => 200,
			Self::BadRequest => 400,
			Self::Unauthorized => 401,
			Self::Forbidden => 403,
			Self::Status { code } => *code,
		}
	}

	/// Returns the redirect target, if the action is a redirect.
	pub fn location(&self) -> Option<&str> {
		match self {
			Self::Redirect { action } => action.location(),
			_ => None,
		}
	}
}
impl From<RedirectAction> for HttpAction {
	fn from(action: RedirectAction) -> Self {
		Self::Redirect { action }
	}
}
impl Display for HttpAction {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Redirect { action } => Display::fmt(action, f),
			_ => write!(f, "{}", self.status_code()),
		}
	}
}

/// Converts actions and handled errors into the host's response type.
pub trait HttpActionAdapter
where
	Self: Send + Sync,
{
	/// Host response type.
	type Response;

	/// Converts the final action of a logic invocation into a response.
	fn adapt(&self, action: HttpAction, context: &dyn WebContext) -> Self::Response;

	/// Converts a handled, non-fatal error into a response.
	fn adapt_error(&self, error: &Error, context: &dyn WebContext) -> Self::Response;
}

/// Framework-neutral response produced by [`PlainResponseAdapter`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainResponse {
	/// HTTP status code.
	pub status: u16,
	/// `Location` header for redirects.
	pub location: Option<String>,
	/// Response body, if any.
	pub body: Option<String>,
}
impl PlainResponse {
	/// Returns true for `3xx` responses.
	pub fn is_redirect(&self) -> bool {
		(300..400).contains(&self.status)
	}
}

/// Adapter producing [`PlainResponse`] values; errors become `500` with the error message.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainResponseAdapter;
impl HttpActionAdapter for PlainResponseAdapter {
	type Response = PlainResponse;

	fn adapt(&self, action: HttpAction, _context: &dyn WebContext) -> Self::Response {
		let status = action.status_code();
		let location = action.location().map(ToOwned::to_owned);
		let body = match action {
			HttpAction::Ok { content } => Some(content),
			_ => None,
		};

		PlainResponse { status, location, body }
	}

	fn adapt_error(&self, error: &Error, _context: &dyn WebContext) -> Self::Response {
		PlainResponse { status: 500, location: None, body: Some(error.to_string()) }
	}
}
