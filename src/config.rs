use std::time::Duration;

use bon::Builder;
use secrecy::ExposeSecret as _;
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::error::Error;
use crate::runtime::Runtime;
use crate::types::ChainId;

pub const API_KEY_SETTING: &str = "convergence.apiKey";
pub const API_SECRET_SETTING: &str = "convergence.apiSecret";
pub const ENDPOINT_SETTING: &str = "convergence.endpoint";
pub const CHAIN_ID_SETTING: &str = "convergence.chainId";
/// Optional. Request timeout in milliseconds; the transport default applies when absent.
pub const TIMEOUT_MS_SETTING: &str = "convergence.timeoutMs";

/// Everything needed to construct a [`crate::client::Client`].
///
/// Build it directly with [`Config::builder`] or load it from the agent runtime's settings with
/// [`Config::from_runtime`]. Either way it is checked by [`Config::validate`] before a client is
/// created, so no request is ever sent with an incomplete configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct Config {
    credentials: Credentials,
    /// Base URL of the venue. Request paths are appended to it verbatim.
    #[builder(into)]
    endpoint: String,
    chain_id: ChainId,
    timeout: Option<Duration>,
}

impl Config {
    /// Reads the `convergence.*` settings from `runtime` and validates them.
    pub fn from_runtime(runtime: &dyn Runtime) -> Result<Self> {
        let required = |key: &str| {
            runtime
                .setting(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::configuration(format!("Missing required config: {key}")))
        };

        let api_key = required(API_KEY_SETTING)?;
        let api_secret = required(API_SECRET_SETTING)?;
        let endpoint = required(ENDPOINT_SETTING)?;
        let chain_id = parse_positive(CHAIN_ID_SETTING, &required(CHAIN_ID_SETTING)?)?;
        let timeout = runtime
            .setting(TIMEOUT_MS_SETTING)
            .map(|ms| parse_positive(TIMEOUT_MS_SETTING, &ms).map(Duration::from_millis))
            .transpose()?;

        let config = Config::builder()
            .credentials(Credentials::new(api_key, api_secret))
            .endpoint(endpoint)
            .chain_id(chain_id)
            .maybe_timeout(timeout)
            .build();
        config.validate()?;

        Ok(config)
    }

    /// Checks that the key and secret are non-empty, that the endpoint is an absolute
    /// `http`/`https` URL and that the chain id is positive. Returns the parsed endpoint.
    pub fn validate(&self) -> Result<Url> {
        if self.credentials.key().is_empty() {
            return Err(Error::configuration(format!(
                "Missing required config: {API_KEY_SETTING}"
            )));
        }
        if self.credentials.secret().expose_secret().is_empty() {
            return Err(Error::configuration(format!(
                "Missing required config: {API_SECRET_SETTING}"
            )));
        }
        if self.chain_id == 0 {
            return Err(Error::configuration(format!(
                "Invalid config: {CHAIN_ID_SETTING} must be a positive integer"
            )));
        }

        let endpoint = Url::parse(&self.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(Error::configuration(format!(
                "Invalid config: {ENDPOINT_SETTING} must be an http(s) URL, got {}",
                self.endpoint
            )));
        }

        Ok(endpoint)
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(Error::configuration(format!(
            "Invalid config: {key} must be a positive integer, got {value}"
        ))),
    }
}
