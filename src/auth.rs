use std::fmt;

use alloy::hex::ToHexExt as _;
use alloy::primitives::keccak256;
use chrono::Utc;
use reqwest::header::HeaderMap;
/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;
use crate::{Result, Timestamp};

pub const X_API_KEY: &str = "X-API-Key";
pub const X_TIMESTAMP: &str = "X-Timestamp";
pub const X_SIGNATURE: &str = "X-Signature";

/// The API key and secret issued by the venue. Both are immutable for the lifetime of a
/// [`crate::client::Client`]. Neither appears in `Debug` output and neither is ever logged.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) key: String,
    pub(crate) secret: SecretString,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"[REDACTED]")
            .field("secret", &self.secret)
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn new<K: Into<String>, S: Into<String>>(key: K, secret: S) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Returns the API key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

/// Source of the request timestamp, in milliseconds since the unix epoch.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock time as reported by the host.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

/// A clock that always reads the same instant. Mostly useful in tests and benchmarks.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Returns the `0x`-prefixed keccak-256 hex digest of `timestamp ++ secret`.
///
/// Only the timestamp and secret are signed. The method, path and body are not part of the
/// message, so a signature is valid for any call made with the same secret in the same
/// millisecond. The venue verifies exactly this scheme, so it cannot be strengthened here
/// without breaking compatibility.
#[must_use]
pub fn signature(timestamp: Timestamp, secret: &SecretString) -> String {
    let message = format!("{timestamp}{}", secret.expose_secret());
    keccak256(message.as_bytes()).encode_hex_with_prefix()
}

/// Returns the [`HeaderMap`] carrying `X-API-Key`, `X-Timestamp` and `X-Signature` for a single
/// request made at `timestamp`.
///
/// Fails with [`crate::error::Kind::Configuration`] when the API key is empty.
pub fn create_headers(credentials: &Credentials, timestamp: Timestamp) -> Result<HeaderMap> {
    if credentials.key.is_empty() {
        return Err(Error::configuration("API key is required"));
    }

    let signature = signature(timestamp, &credentials.secret);

    let mut map = HeaderMap::new();
    map.insert(X_API_KEY, credentials.key.parse()?);
    map.insert(X_TIMESTAMP, timestamp.to_string().parse()?);
    map.insert(X_SIGNATURE, signature.parse()?);

    Ok(map)
}

/// Reads `clock` once and signs with that reading. See [`create_headers`].
pub fn build_auth_headers(credentials: &Credentials, clock: &dyn Clock) -> Result<HeaderMap> {
    create_headers(credentials, clock.now())
}
