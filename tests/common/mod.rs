#![allow(clippy::unwrap_used, reason = "tests can panic on unwrap")]
#![allow(
    unused,
    reason = "Each test crate uses a different subset of these helpers"
)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use convergence_client::auth::{Credentials, FixedClock};
use convergence_client::client::Client;
use convergence_client::config::{
    API_KEY_SETTING, API_SECRET_SETTING, CHAIN_ID_SETTING, Config, ENDPOINT_SETTING,
};
use convergence_client::runtime::Runtime;
use convergence_client::types::{Address, address};
use httpmock::MockServer;

pub const API_KEY: &str = "test-api-key";
pub const API_SECRET: &str = "my-api-secret";

pub const TIMESTAMP: i64 = 1_700_000_000_000;
/// keccak256("1700000000000my-api-secret")
pub const SIGNATURE: &str = "0xe7ecb99672dd5f484184381705fd31ef2e95a4083a0af7d5aece21f6a98d5344";

pub const X_API_KEY: &str = "X-API-Key";
pub const X_TIMESTAMP: &str = "X-Timestamp";
pub const X_SIGNATURE: &str = "X-Signature";

pub const RFQ_ID: &str = "0196464a-a1fa-75e6-821e-31aa0794f7ad";

pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// Agent runtime stand-in: serves settings from a map and records every log line.
#[derive(Default)]
pub struct TestRuntime {
    settings: HashMap<String, String>,
    logs: Mutex<Vec<String>>,
}

impl TestRuntime {
    #[must_use]
    pub fn with_settings(endpoint: &str) -> Self {
        let settings = [
            (API_KEY_SETTING, API_KEY),
            (API_SECRET_SETTING, API_SECRET),
            (ENDPOINT_SETTING, endpoint),
            (CHAIN_ID_SETTING, "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        Self {
            settings,
            logs: Mutex::default(),
        }
    }

    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.settings.remove(key);
        self
    }

    #[must_use]
    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runtime for TestRuntime {
    fn setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }

    async fn log(&self, message: &str) {
        self.logs.lock().unwrap().push(message.to_owned());
    }
}

#[must_use]
pub fn config(endpoint: &str) -> Config {
    Config::builder()
        .credentials(Credentials::new(API_KEY, API_SECRET))
        .endpoint(endpoint)
        .chain_id(1)
        .build()
}

/// A client pointed at `endpoint` whose requests are all stamped with [`TIMESTAMP`].
pub fn create_client(endpoint: &str) -> anyhow::Result<(Client, Arc<TestRuntime>)> {
    let runtime = Arc::new(TestRuntime::default());
    let client = Client::new(config(endpoint), Arc::clone(&runtime) as Arc<dyn Runtime>)?
        .with_clock(Arc::new(FixedClock(TIMESTAMP)));

    Ok((client, runtime))
}

pub fn create_mocked(server: &MockServer) -> anyhow::Result<(Client, Arc<TestRuntime>)> {
    create_client(&server.base_url())
}
