//! Indirect-client authentication pipeline and logout orchestration for browser-redirect SSO:
//! pluggable redirect/extract/validate/create strategies, open-redirect-safe post-logout
//! redirects, and first-match central logout across every provider a user signed in with.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod action;
pub mod client;
pub mod context;
pub mod engine;
pub mod error;
pub mod obs;
pub mod profile;
pub mod session;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use http::Method;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
pub use url;
#[cfg(test)] use color_eyre as _;
