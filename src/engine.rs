//! Request-level orchestrators built on top of the client registry.
//!
//! Engines are plain values: they hold no per-request state, so hosts construct one at
//! startup and share it across requests. Every failure other than a configuration fault
//! is routed through the [`ExceptionHandler`] and turned into a response.

pub mod callback;
pub mod exception;
pub mod logout;

pub use callback::*;
pub use exception::*;
pub use logout::*;

/// Request parameter carrying the post-logout redirect URL.
pub const URL_PARAMETER: &str = "url";
/// Request parameter naming the client a callback belongs to.
pub const CLIENT_NAME_PARAMETER: &str = "client_name";
/// Default post-logout URL pattern: relative same-origin paths only (`/` or `/x...`,
/// never `//host`).
pub const DEFAULT_LOGOUT_URL_PATTERN: &str = r"^(\/|\/[^\/].*)$";
