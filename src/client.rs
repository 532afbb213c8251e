use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::auth::{self, Clock, Credentials, SystemClock};
use crate::Result;
use crate::config::Config;
use crate::error::{Error, Kind};
use crate::runtime::Runtime;
use crate::types::{
    ChainId, CollateralAccount, CollateralRequest, CollateralTransferResponse,
    ConfirmRfqResponseRequest, CreateRfqRequest, Order, QuoteRequest, QuoteResponse, RfqDetails,
    RfqOrder, RfqResponse, SettlementRequest, TradeRequest, TradeResponse,
};

/// Passed as the body of calls that send none.
const NO_BODY: Option<&()> = None;

/// Signed client for the venue's REST API.
///
/// Every call is signed with fresh `X-API-Key`/`X-Timestamp`/`X-Signature` headers, sent once,
/// and either decoded or reported. A failed call is logged exactly once through
/// [`Runtime::log`] with its [`crate::error::NormalizedError`] message, and the original
/// [`Error`] is returned unchanged. There are no retries.
///
/// Calls share no mutable state, so a `Client` can be cloned and used concurrently.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use convergence_client::auth::Credentials;
/// use convergence_client::client::Client;
/// use convergence_client::config::Config;
/// use convergence_client::runtime::Runtime;
///
/// # async fn example(runtime: Arc<dyn Runtime>) -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::builder()
///     .credentials(Credentials::new("api-key", "api-secret"))
///     .endpoint("https://api.convergence.test")
///     .chain_id(1)
///     .build();
/// let client = Client::new(config, runtime)?;
///
/// for rfq in client.rfqs().await? {
///     println!("{} {}", rfq.id, rfq.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    /// Base URL without a trailing slash; request paths start with `/`.
    endpoint: String,
    credentials: Credentials,
    chain_id: ChainId,
    client: ReqwestClient,
    runtime: Arc<dyn Runtime>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Validates `config` and creates a client that reports failures to `runtime`.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Configuration`] error if `config` is incomplete or the
    /// HTTP client fails to build.
    pub fn new(config: Config, runtime: Arc<dyn Runtime>) -> Result<Client> {
        let endpoint = config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("convergence_client"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let mut builder = ReqwestClient::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::with_source(Kind::Configuration, e))?;

        Ok(Self {
            endpoint: endpoint.as_str().trim_end_matches('/').to_owned(),
            credentials: config.credentials().clone(),
            chain_id: config.chain_id(),
            client,
            runtime,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock used to timestamp requests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Signs and sends `method path` with an optional JSON `body`, decoding the JSON response.
    ///
    /// Headers are built before any network I/O, so an empty API key fails here without a
    /// request being made. Every failure, including that one, is logged once and returned
    /// as-is.
    pub async fn send<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let outcome = match self.build_request(method.clone(), path, body) {
            Ok(request) => crate::request(&self.client, request).await,
            Err(e) => Err(e),
        };

        self.report(&method, path, outcome).await
    }

    /// Like [`Client::send`], for calls whose response carries no body.
    pub async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let outcome = match self.build_request(method.clone(), path, body) {
            Ok(request) => crate::request_empty(&self.client, request).await,
            Err(e) => Err(e),
        };

        self.report(&method, path, outcome).await
    }

    fn build_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let headers = auth::build_auth_headers(&self.credentials, self.clock.as_ref())?;

        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.endpoint))
            .headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.build()?)
    }

    async fn report<T>(&self, method: &Method, path: &str, outcome: Result<T>) -> Result<T> {
        if let Err(e) = &outcome {
            let normalized = e.normalize();

            #[cfg(feature = "tracing")]
            tracing::error!(
                method = %method,
                path = %path,
                kind = ?e.kind(),
                status = ?normalized.status,
                message = %normalized.message,
                "venue call failed"
            );

            self.runtime
                .log(&format!("{method} {path} failed: {}", normalized.message))
                .await;
        }

        outcome
    }

    /// Requests a firm quote for swapping `amount` of `token_in` into `token_out`.
    pub async fn request_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse> {
        self.send(Method::POST, "/v1/quote", Some(request)).await
    }

    /// Executes a previously received quote.
    pub async fn execute_trade(&self, request: &TradeRequest) -> Result<TradeResponse> {
        self.send(Method::POST, "/v1/trade", Some(request)).await
    }

    /// Lists the RFQs visible to this API key.
    pub async fn rfqs(&self) -> Result<Vec<RfqDetails>> {
        self.send(Method::GET, "/api/rfqs", NO_BODY).await
    }

    pub async fn create_rfq(&self, request: &CreateRfqRequest) -> Result<RfqDetails> {
        self.send(Method::POST, "/api/rfqs", Some(request)).await
    }

    pub async fn rfq(&self, rfq_id: &str) -> Result<RfqDetails> {
        let path = format!("/api/rfqs/{}", path_segment(rfq_id)?);
        self.send(Method::GET, &path, NO_BODY).await
    }

    /// Cancels an RFQ. Whether cancelling an already cancelled RFQ succeeds or fails with a
    /// [`Kind::Remote`] error is up to the venue.
    pub async fn cancel_rfq(&self, rfq_id: &str) -> Result<()> {
        let path = format!("/api/rfqs/{}", path_segment(rfq_id)?);
        self.send_empty(Method::DELETE, &path, NO_BODY).await
    }

    /// Lists the orders market makers have placed against an RFQ.
    pub async fn rfq_orders(&self, rfq_id: &str) -> Result<Vec<RfqOrder>> {
        let path = format!("/api/rfqs/{}/orders", path_segment(rfq_id)?);
        self.send(Method::GET, &path, NO_BODY).await
    }

    /// Confirms one market maker's response to an RFQ.
    pub async fn confirm_rfq_response(
        &self,
        rfq_id: &str,
        request: &ConfirmRfqResponseRequest,
    ) -> Result<RfqResponse> {
        let path = format!("/api/rfqs/{}/orders", path_segment(rfq_id)?);
        self.send(Method::PUT, &path, Some(request)).await
    }

    pub async fn settle_rfq(&self, request: &SettlementRequest) -> Result<TradeResponse> {
        self.send(Method::PUT, "/api/rfq/settle", Some(request)).await
    }

    pub async fn collateral_account(&self) -> Result<CollateralAccount> {
        self.send(Method::GET, "/api/collateral/account", NO_BODY)
            .await
    }

    pub async fn create_collateral_account(&self) -> Result<CollateralAccount> {
        self.send(Method::POST, "/api/collateral/account", Some(&json!({})))
            .await
    }

    pub async fn deposit_collateral(
        &self,
        request: &CollateralRequest,
    ) -> Result<CollateralTransferResponse> {
        self.send(Method::POST, "/api/collateral/fund", Some(request))
            .await
    }

    pub async fn withdraw_collateral(
        &self,
        request: &CollateralRequest,
    ) -> Result<CollateralTransferResponse> {
        self.send(Method::POST, "/api/collateral/withdraw", Some(request))
            .await
    }

    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.send(Method::GET, "/api/orders", NO_BODY).await
    }
}

/// Ids are interpolated into paths, so only URL-unreserved characters are accepted.
fn path_segment(id: &str) -> Result<&str> {
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');

    if id.is_empty() || !id.chars().all(unreserved) || id == "." || id == ".." {
        return Err(Error::validation(format!("invalid id {id:?}")));
    }

    Ok(id)
}
