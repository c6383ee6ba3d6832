//! Validators for recipient and amount fields.
//!
//! Every check recomputes from scratch on each relevant edit. Results are
//! boolean flags; messages are derived from the flags for display.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use super::amount::{MAX_DECIMAL_PLACES, format_with_commas, has_valid_decimal_places, parse_float};

/// User-facing validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid address")]
    InvalidAddress,
    #[error("Invalid holder address")]
    InvalidHolderAddress,
    #[error("Invalid holder summary")]
    InvalidHolderSummary,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Invalid denomination")]
    InvalidDenomination,
    #[error("Invalid amount. Must be at least {0} THETA")]
    BelowMinimum(String),
}

/// How the amount field is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPolicy {
    /// Negative amounts count as insufficient funds.
    Transfer,
    /// Zero or anything under `minimum` is an invalid amount.
    Stake { minimum: Decimal },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityFlags {
    pub invalid_recipient: bool,
    pub insufficient_funds: bool,
    pub invalid_decimal_places: bool,
    /// Stake forms only.
    pub invalid_amount: bool,
}

impl ValidityFlags {
    pub fn any(&self) -> bool {
        self.invalid_recipient
            || self.insufficient_funds
            || self.invalid_decimal_places
            || self.invalid_amount
    }

    pub fn set_recipient_valid(&mut self, valid: bool) {
        self.invalid_recipient = !valid;
    }

    /// Run every amount check for `policy` against `balance`.
    pub fn validate_amount(&mut self, amount: &str, balance: &str, policy: AmountPolicy) {
        let value = parse_float(amount);
        let available = parse_float(balance);

        self.invalid_decimal_places = !has_valid_decimal_places(amount, MAX_DECIMAL_PLACES);
        match policy {
            AmountPolicy::Transfer => {
                self.insufficient_funds = value > available || value < 0.0;
                self.invalid_amount = false;
            }
            AmountPolicy::Stake { minimum } => {
                self.insufficient_funds = value > available;
                self.invalid_amount = below_minimum(value, minimum);
            }
        }
    }

    pub fn clear_amount(&mut self) {
        self.insufficient_funds = false;
        self.invalid_decimal_places = false;
        self.invalid_amount = false;
    }

    /// Message for the amount field, most severe first.
    pub fn amount_error(&self, policy: AmountPolicy) -> Option<ValidationError> {
        if self.insufficient_funds {
            Some(ValidationError::InsufficientFunds)
        } else if self.invalid_decimal_places {
            Some(ValidationError::InvalidDenomination)
        } else if self.invalid_amount {
            let minimum = match policy {
                AmountPolicy::Stake { minimum } => minimum,
                AmountPolicy::Transfer => Decimal::ZERO,
            };
            Some(ValidationError::BelowMinimum(format_with_commas(
                &minimum.normalize().to_string(),
            )))
        } else {
            None
        }
    }
}

fn below_minimum(value: f64, minimum: Decimal) -> bool {
    let minimum = minimum.to_f64().unwrap_or(f64::INFINITY);
    value == 0.0 || value < minimum
}
