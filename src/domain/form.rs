//! Shared form protocol.
//!
//! A form is a synchronous state machine. Every edit runs store, validate and
//! resolve-fee in that order. Any network work the edit needs is returned as
//! [`Effect`]s for the caller to run; their completions come back through
//! [`TxForm::apply`] in whatever order they finish.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::{
    fee::GasQuery,
    token::{TokenType, WalletContext},
    validation::{ValidationError, ValidityFlags},
};

/// Editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    TokenType,
    /// Recipient address; the holder for stake forms.
    Recipient,
    Amount,
}

/// Network work requested by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    FetchGasPrice,
    EstimateFee(GasQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimate {
    pub gas_limit: u64,
    /// ETH.
    pub fee: Decimal,
}

/// Completion of an [`Effect`]. Errors carry the collaborator's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeUpdate {
    GasPrice(Result<Decimal, String>),
    FeeEstimate {
        query: GasQuery,
        result: Result<FeeEstimate, String>,
    },
}

/// Common surface of the transfer and stake forms.
pub trait TxForm {
    fn token_type(&self) -> TokenType;

    /// Token types offered by the selector.
    fn token_choices(&self) -> &'static [TokenType];

    fn recipient(&self) -> &str;

    fn amount(&self) -> &str;

    fn fee(&self) -> Option<Decimal>;

    fn flags(&self) -> ValidityFlags;

    fn wallet(&self) -> &WalletContext;

    /// Replace the externally supplied wallet data and recheck the amount
    /// against the new balances.
    fn set_wallet(&mut self, wallet: WalletContext) -> Vec<Effect>;

    /// Store `raw` into `field` and run the pipeline for it.
    fn update(&mut self, field: Field, raw: &str) -> Vec<Effect>;

    /// Switch token and reset every dependent field.
    fn switch_token(&mut self, token: TokenType) -> Vec<Effect>;

    /// Fill the amount with the maximum sendable value.
    fn use_entire_balance(&mut self) -> Vec<Effect>;

    /// Apply a completed network call.
    fn apply(&mut self, update: FeeUpdate) -> Vec<Effect>;

    /// Non-empty recipient and amount, and no validity flag set.
    fn is_valid(&self) -> bool;

    /// Whether the entire-balance shortcut should be offered.
    fn can_use_entire_balance(&self) -> bool;

    fn recipient_error(&self) -> Option<ValidationError>;

    fn amount_error(&self) -> Option<ValidationError>;

    /// Last network failure, if the fee could not be resolved.
    fn network_error(&self) -> Option<&str> {
        None
    }

    /// Dispatch the transaction for confirmation. Returns whether it was sent.
    fn submit(&self) -> bool;

    /// Cycle to the next offered token type.
    fn next_token(&mut self) -> Vec<Effect> {
        let choices = self.token_choices();
        if choices.len() < 2 {
            return Vec::new();
        }
        let current = choices
            .iter()
            .position(|t| *t == self.token_type())
            .unwrap_or(0);
        self.switch_token(choices[(current + 1) % choices.len()])
    }
}
