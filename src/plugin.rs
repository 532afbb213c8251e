//! Agent-runtime plugin built on the signed [`Client`].

use std::fmt;
use std::sync::Arc;

use strum_macros::Display;

use crate::Result;
use crate::cache::{CacheStore, QuoteCache};
use crate::client::Client;
use crate::config::Config;
use crate::error::Error;
use crate::runtime::Runtime;
use crate::types::{
    Address, CreateRfqRequest, QuoteRequest, QuoteResponse, RfqDetails, RfqQuote, Side, U256,
};

/// What the plugin advertises to the agent runtime.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Capability {
    #[strum(serialize = "createRFQ")]
    CreateRfq,
    #[strum(serialize = "monitorRFQ")]
    MonitorRfq,
    #[strum(serialize = "findBestQuote")]
    FindBestQuote,
    #[strum(serialize = "getQuote")]
    GetQuote,
    #[strum(serialize = "executeTrade")]
    ExecuteTrade,
}

const CAPABILITIES: [Capability; 5] = [
    Capability::CreateRfq,
    Capability::MonitorRfq,
    Capability::FindBestQuote,
    Capability::GetQuote,
    Capability::ExecuteTrade,
];

/// The best market maker response found by [`Plugin::find_best_quote`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct BestQuote {
    pub rfq_id: String,
    pub quote: RfqQuote,
}

#[derive(Clone)]
pub struct Plugin {
    client: Client,
    cache: Option<QuoteCache>,
    runtime: Arc<dyn Runtime>,
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("client", &self.client)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Plugin {
    pub const NAME: &'static str = "convergence";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    #[must_use]
    pub fn capabilities() -> &'static [Capability] {
        &CAPABILITIES
    }

    /// Loads and validates the `convergence.*` settings from `runtime` and builds the client.
    /// Nothing is sent to the venue.
    pub fn initialize(runtime: Arc<dyn Runtime>) -> Result<Self> {
        let config = Config::from_runtime(runtime.as_ref())?;
        let client = Client::new(config, Arc::clone(&runtime))?;

        Ok(Self::new(client, runtime))
    }

    #[must_use]
    pub fn new(client: Client, runtime: Arc<dyn Runtime>) -> Self {
        Self {
            client,
            cache: None,
            runtime,
        }
    }

    /// Caches quotes received through [`Plugin::get_quote`] in `store`.
    #[must_use]
    pub fn with_cache(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(QuoteCache::new(store, Arc::clone(&self.runtime)));
        self
    }

    /// The underlying client, for every venue call the plugin does not wrap.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Requests a quote and, when a cache is attached, caches it under its quote id.
    ///
    /// Only the venue call can fail. A quote that cannot be cached, such as one with an empty
    /// quote id, is logged through [`Runtime::log`] and still returned.
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse> {
        let quote = self.client.request_quote(request).await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.cache_quote(&quote).await
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(quote_id = %quote.quote_id, error = %e, "quote not cached");

            self.runtime
                .log(&format!("Failed to cache quote: {}", e.normalize().message))
                .await;
        }

        Ok(quote)
    }

    /// Returns a previously cached quote. Always `None` without a cache.
    pub async fn cached_quote(&self, quote_id: &str) -> Result<Option<QuoteResponse>> {
        match &self.cache {
            Some(cache) => cache.quote(quote_id).await,
            None => Ok(None),
        }
    }

    /// Creates an RFQ, then reads it back so the result reflects the venue's current state
    /// (status and any responses already received) rather than the creation echo.
    pub async fn create_and_monitor_rfq(&self, request: &CreateRfqRequest) -> Result<RfqDetails> {
        let created = self.client.create_rfq(request).await?;

        self.client.rfq(&created.id).await
    }

    /// Searches the open RFQs for `token_in`/`token_out`/`amount` and returns the best response
    /// among them for a requester on `side`: the highest price when selling, the lowest when
    /// buying. Ties go to the first response listed.
    ///
    /// Fails with [`crate::error::Kind::Validation`] for [`Side::Unknown`] before any request.
    pub async fn find_best_quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount: U256,
        side: Side,
    ) -> Result<Option<BestQuote>> {
        let prefer_higher = match side {
            Side::Sell => true,
            Side::Buy => false,
            Side::Unknown => {
                return Err(Error::validation(format!(
                    "cannot rank quotes for side {side}"
                )));
            }
        };

        let rfqs = self.client.rfqs().await?;

        let best = rfqs
            .into_iter()
            .filter(|rfq| rfq.token_in == token_in && rfq.token_out == token_out)
            .filter(|rfq| rfq.amount == amount)
            .flat_map(|rfq| {
                let rfq_id = rfq.id;
                rfq.responses.into_iter().map(move |quote| BestQuote {
                    rfq_id: rfq_id.clone(),
                    quote,
                })
            })
            .reduce(|best, candidate| {
                let better = if prefer_higher {
                    candidate.quote.price > best.quote.price
                } else {
                    candidate.quote.price < best.quote.price
                };

                if better { candidate } else { best }
            });

        Ok(best)
    }
}
