use bon::Builder;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::types::{Address, Side, U256};

/// Request for an executable price on a token pair.
///
/// # Example
///
/// ```
/// use convergence_client::types::{QuoteRequest, Side, U256, address};
///
/// let request = QuoteRequest::builder()
///     .token_in(address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"))
///     .token_out(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"))
///     .amount(U256::from(10_u64).pow(U256::from(18_u64)))
///     .side(Side::Sell)
///     .build();
/// ```
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub token_in: Address,
    pub token_out: Address,
    /// Amount of `token_in`, in base units.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    pub side: Side,
}

/// Request to open an RFQ that market makers can respond to.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct CreateRfqRequest {
    pub token_in: Address,
    pub token_out: Address,
    /// Amount of `token_in`, in base units.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    pub side: Side,
    /// Unix timestamp (seconds) after which the RFQ stops accepting responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,
}

/// Executes a previously received quote.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub quote_id: String,
    /// The signature returned alongside the quote.
    pub signature: String,
    /// Unix timestamp (seconds) after which the trade must not execute.
    pub deadline: i64,
}

/// Accepts one market maker's response to an RFQ.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRfqResponseRequest {
    pub rfq_id: String,
    /// Account of the market maker whose response is being confirmed.
    pub response_account: Address,
    pub response_side: Side,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub rfq_id: String,
    pub response_id: String,
    pub signature: String,
}

/// Deposit into or withdrawal from the collateral account.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(on(String, into))]
pub struct CollateralRequest {
    /// Amount in base units of `currency`.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: U256,
    pub currency: String,
}
