//! Wire types for the venue API, plus re-exports of the primitive types they are built on so
//! callers don't need to add these dependencies to their `Cargo.toml`.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub mod request;
pub mod response;

/// EVM address type and the [`address!`] macro for compile-time address literals.
/// [`U256`] carries token amounts in base units.
pub use alloy::primitives::{Address, ChainId, U256, address};
/// Date and time types.
pub use chrono::{DateTime, Utc};
/// Arbitrary precision decimal type for prices.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use convergence_client::types::dec;
/// let price = dec!(1850.25);
/// ```
pub use rust_decimal_macros::dec;

pub use request::{
    CollateralRequest, ConfirmRfqResponseRequest, CreateRfqRequest, QuoteRequest,
    SettlementRequest, TradeRequest,
};
pub use response::{
    CollateralAccount, CollateralTransferResponse, Order, QuoteResponse, RfqDetails, RfqOrder,
    RfqQuote, RfqResponse, TradeResponse,
};

/// Direction of a quote or RFQ from the requester's point of view.
#[non_exhaustive]
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Side {
    #[serde(alias = "buy")]
    Buy,
    #[serde(alias = "sell")]
    Sell,
    /// Any side the venue reports that this crate does not know about. Never sent to the venue.
    #[serde(other, skip_serializing)]
    Unknown,
}
