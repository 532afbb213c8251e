//! Short-lived quote cache.
//!
//! The cache is advisory: quotes can always be fetched again, so a store that fails to read or
//! write is reported through [`Runtime::log`] and otherwise behaves like a miss. Only invalid
//! caller input (an empty quote id) is returned as an error.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::Result;
use crate::error::Error;
use crate::runtime::Runtime;
use crate::types::QuoteResponse;

const KEY_PREFIX: &str = "convergence:";

/// How long a quote stays cached unless another TTL is given.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Key/value store with per-entry expiry, typically provided by the agent runtime.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// Process-local [`CacheStore`]. Expired entries are evicted when read and swept on every write,
/// so keys that are never read again do not accumulate.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);

        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| Error::validation(format!("ttl {ttl:?} is out of range")))?;

        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries
            .insert(key.to_owned(), Entry { value, expires_at });

        Ok(())
    }
}

/// Caches [`QuoteResponse`]s by quote id under `convergence:quote:<id>`.
#[derive(Clone)]
pub struct QuoteCache {
    store: Arc<dyn CacheStore>,
    runtime: Arc<dyn Runtime>,
    ttl: Duration,
}

impl fmt::Debug for QuoteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl QuoteCache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, runtime: Arc<dyn Runtime>) -> Self {
        Self {
            store,
            runtime,
            ttl: DEFAULT_TTL,
        }
    }

    /// Overrides [`DEFAULT_TTL`] for quotes cached without an explicit TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `quote` for the default TTL. See [`QuoteCache::cache_quote_for`].
    pub async fn cache_quote(&self, quote: &QuoteResponse) -> Result<()> {
        self.cache_quote_for(quote, self.ttl).await
    }

    /// Stores `quote` for `ttl`. A store failure is logged and ignored.
    pub async fn cache_quote_for(&self, quote: &QuoteResponse, ttl: Duration) -> Result<()> {
        let key = key(&quote.quote_id)?;

        let outcome = match serde_json::to_string(quote) {
            Ok(value) => self.store.set(&key, value, ttl).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            #[cfg(feature = "tracing")]
            tracing::warn!(key = %key, error = %e, "failed to cache quote");

            self.runtime
                .log(&format!("Failed to cache quote: {}", e.normalize().message))
                .await;
        }

        Ok(())
    }

    /// Returns the cached quote, or `None` on a miss, an expired entry, a store failure or an
    /// entry that no longer decodes.
    pub async fn quote(&self, quote_id: &str) -> Result<Option<QuoteResponse>> {
        let key = key(quote_id)?;

        let outcome: Result<Option<QuoteResponse>> = match self.store.get(&key).await {
            Ok(Some(value)) => serde_json::from_str(&value).map(Some).map_err(Error::from),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(quote) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(key = %key, hit = quote.is_some(), "quote cache lookup");

                Ok(quote)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(key = %key, error = %e, "failed to read cached quote");

                self.runtime
                    .log(&format!(
                        "Failed to get quote from cache: {}",
                        e.normalize().message
                    ))
                    .await;

                Ok(None)
            }
        }
    }
}

fn key(quote_id: &str) -> Result<String> {
    if quote_id.is_empty() {
        return Err(Error::validation("Quote ID is required"));
    }

    Ok(format!("{KEY_PREFIX}quote:{quote_id}"))
}
