//! Authenticator decorator that remembers successful validations for a limited time.
//!
//! Providers that validate tickets or tokens over the network are expensive to call on
//! every request. [`LocalCachingAuthenticator`] keys successful validations by the SHA-256
//! digest of the credentials' cache key (the raw secret is never stored), replays the
//! resolved profile on a hit, and only calls the wrapped authenticator on a miss. The
//! wrapped authenticator stays reachable through [`Authenticator::delegate`] so setup-time
//! capability checks inspect the real implementation.

// crates.io
use sha2::{Digest, Sha256};
use time::PrimitiveDateTime;
// self
use crate::{
	_prelude::*,
	client::{Authenticator, AuthenticatorCapability, Credentials, StrategyFuture},
	context::WebContext,
	profile::UserProfile,
};

type CacheKey = [u8; 32];

#[derive(Clone, Debug)]
struct CacheEntry {
	profile: Option<UserProfile>,
	expires_at: OffsetDateTime,
}

/// Caching decorator around another [`Authenticator`].
pub struct LocalCachingAuthenticator<C>
where
	C: Credentials,
{
	delegate: Arc<dyn Authenticator<C>>,
	ttl: Duration,
	max_entries: usize,
	cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}
impl<C> LocalCachingAuthenticator<C>
where
	C: Credentials,
{
	const DEFAULT_MAX_ENTRIES: usize = 10_000;

	/// Wraps `delegate`, remembering successful validations for `ttl`.
	pub fn new(delegate: Arc<dyn Authenticator<C>>, ttl: Duration) -> Self {
		Self {
			delegate,
			ttl: if ttl.is_negative() { Duration::ZERO } else { ttl },
			max_entries: Self::DEFAULT_MAX_ENTRIES,
			cache: Mutex::new(HashMap::new()),
		}
	}

	/// Caps the number of cached validations (defaults to 10 000, minimum 1).
	pub fn with_max_entries(mut self, max_entries: usize) -> Self {
		self.max_entries = max_entries.max(1);

		self
	}

	/// Number of live and not-yet-purged entries.
	pub fn len(&self) -> usize {
		self.cache.lock().len()
	}

	/// Returns true when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.cache.lock().is_empty()
	}

	/// Drops the cached validation for the credentials, if any.
	pub fn invalidate(&self, credentials: &C) {
		if let Some(key) = cache_key(credentials) {
			self.cache.lock().remove(&key);
		}
	}

	/// Drops every cached validation.
	pub fn clear(&self) {
		self.cache.lock().clear();
	}

	fn lookup(&self, key: &CacheKey, now: OffsetDateTime) -> Option<Option<UserProfile>> {
		let mut cache = self.cache.lock();

		match cache.get(key) {
			Some(entry) if entry.expires_at > now => Some(entry.profile.clone()),
			Some(_) => {
				cache.remove(key);

				None
			},
			None => None,
		}
	}

	fn remember(&self, key: CacheKey, profile: Option<UserProfile>, now: OffsetDateTime) {
		if self.ttl.is_zero() {
			return;
		}

		let mut cache = self.cache.lock();

		cache.retain(|_, entry| entry.expires_at > now);

		if cache.len() >= self.max_entries
			&& !cache.contains_key(&key)
			&& let Some(oldest) =
				cache.iter().min_by_key(|(_, entry)| entry.expires_at).map(|(key, _)| *key)
		{
			cache.remove(&oldest);
		}

		let expires_at =
			now.checked_add(self.ttl).unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc());

		cache.insert(key, CacheEntry { profile, expires_at });
	}
}
impl<C> Authenticator<C> for LocalCachingAuthenticator<C>
where
	C: Credentials,
{
	fn validate<'a>(
		&'a self,
		credentials: &'a mut C,
		context: &'a dyn WebContext,
	) -> StrategyFuture<'a, ()> {
		Box::pin(async move {
			let key = cache_key(credentials);

			if let Some(key) = key.as_ref()
				&& let Some(cached) = self.lookup(key, OffsetDateTime::now_utc())
			{
				tracing::debug!(authenticator = self.delegate.name(), "Credentials found in cache.");

				if let Some(profile) = cached {
					credentials.set_user_profile(profile);
				}

				return Ok(());
			}

			self.delegate.validate(credentials, context).await?;

			if let Some(key) = key {
				self.remember(key, credentials.user_profile().cloned(), OffsetDateTime::now_utc());
			}

			Ok(())
		})
	}

	fn capabilities(&self) -> &[AuthenticatorCapability] {
		self.delegate.capabilities()
	}

	fn delegate(&self) -> Option<&dyn Authenticator<C>> {
		Some(self.delegate.as_ref())
	}

	fn init(&self) -> Result<()> {
		self.delegate.init()
	}

	fn name(&self) -> &str {
		"LocalCachingAuthenticator"
	}
}
impl<C> Debug for LocalCachingAuthenticator<C>
where
	C: Credentials,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LocalCachingAuthenticator")
			.field("delegate", &self.delegate.name())
			.field("ttl", &self.ttl)
			.field("max_entries", &self.max_entries)
			.finish()
	}
}

fn cache_key<C>(credentials: &C) -> Option<CacheKey>
where
	C: Credentials,
{
	let digest = Sha256::digest(credentials.cache_key()?.as_bytes());
	let mut key = [0_u8; 32];

	key.copy_from_slice(&digest);

	Some(key)
}
