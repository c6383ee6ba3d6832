//! Fee resolution strategies.
//!
//! Stake deposits use a flat fee known up front. Transfers resolve their fee in
//! two stages: a gas price fetched independently of the inputs, then a gas
//! limit estimated from a snapshot of the current inputs. The fee is the exact
//! decimal product of the two.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::token::TokenType;

/// Gwei per ETH.
pub const GWEI_PER_ETH: Decimal = dec!(1000000000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeStrategy {
    /// Fixed fee, never recomputed from network state.
    Constant(Decimal),
    /// Gas price x gas limit, resolved asynchronously.
    Gas,
}

impl FeeStrategy {
    /// Fee to use right after construction or a token reset.
    pub fn initial_fee(&self) -> Option<Decimal> {
        match self {
            FeeStrategy::Constant(fee) => Some(*fee),
            FeeStrategy::Gas => None,
        }
    }
}

/// Snapshot of the inputs a gas estimate is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasQuery {
    pub token_type: TokenType,
    pub to: String,
    pub from: String,
    pub amount: String,
    /// Gwei.
    pub gas_price: Decimal,
}

/// Fee in ETH for `gas_limit` units at `gas_price` Gwei.
///
/// Returns `None` if the product does not fit a `Decimal`.
pub fn transaction_fee(gas_price: Decimal, gas_limit: u64) -> Option<Decimal> {
    gas_price
        .checked_mul(Decimal::from(gas_limit))?
        .checked_div(GWEI_PER_ETH)
        .map(|fee| fee.normalize())
}
