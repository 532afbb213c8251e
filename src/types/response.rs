use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::types::{Address, Decimal, U256};

/// A firm quote. `signature` must be passed back when executing it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_id: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Unix timestamp (seconds) after which the quote can no longer be executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

/// Outcome of a trade execution or an RFQ settlement.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub success: bool,
    pub tx_hash: Option<String>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct RfqDetails {
    pub id: String,
    pub status: String,
    pub token_in: Address,
    pub token_out: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    /// Market maker responses received so far.
    #[serde(default)]
    #[builder(default)]
    pub responses: Vec<RfqQuote>,
}

/// A market maker's priced response embedded in [`RfqDetails`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[builder(on(String, into))]
pub struct RfqQuote {
    pub id: String,
    pub price: Decimal,
    pub signature: String,
}

/// A market maker's order placed against an RFQ.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct RfqOrder {
    pub id: String,
    pub rfq_id: String,
    pub maker: Address,
    pub price: Decimal,
    pub signature: String,
    pub status: String,
}

/// Result of confirming an RFQ response.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct RfqResponse {
    pub success: bool,
    pub order_id: Option<String>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[builder(on(String, into))]
pub struct CollateralAccount {
    pub address: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub balance: U256,
    pub currency: String,
}

/// Result of a collateral deposit or withdrawal.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct CollateralTransferResponse {
    #[serde(default)]
    #[builder(default)]
    pub success: bool,
    pub tx_hash: Option<String>,
    /// Account balance after the transfer, when the venue reports it.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub balance: Option<U256>,
}

/// An order from `/api/orders`, carrying what is needed to settle the RFQ it belongs to.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Deserialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Option<String>,
    pub rfq_id: String,
    pub response_id: String,
    pub signature: String,
    pub status: Option<String>,
}
