#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod plugin;
pub mod runtime;
pub(crate) mod serde_helpers;
pub mod types;

use reqwest::{Request, Response};
use serde::de::DeserializeOwned;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Timestamp in milliseconds since [`std::time::UNIX_EPOCH`]
pub type Timestamp = i64;

/// Executes `request` and decodes the JSON body of a successful response.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<T: DeserializeOwned>(client: &reqwest::Client, request: Request) -> Result<T> {
    let response = execute(client, request).await?;

    let json_value = response.json::<serde_json::Value>().await?;
    serde_helpers::deserialize_with_warnings(json_value)
}

/// Executes `request` for an endpoint that answers without a (JSON) body, discarding whatever
/// body a successful response carries.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request_empty(client: &reqwest::Client, request: Request) -> Result<()> {
    execute(client, request).await.map(drop)
}

async fn execute(client: &reqwest::Client, request: Request) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let body = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            body = %body,
            "venue request failed"
        );

        return Err(Error::remote(status_code, method, path, body));
    }

    Ok(response)
}
