//! "Entire balance" shortcut.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::{amount::parse_float, fee::FeeStrategy, token::TokenType};

/// What the shortcut should do to the amount field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntireBalance {
    /// Leave the amount alone.
    Skip,
    /// Write this amount.
    Fill(String),
    /// Write this provisional amount, then replace it with `balance - fee` once
    /// the fee for it has resolved.
    FillThenSubtractFee(String),
}

/// Plan the shortcut for `token` given its `balance` and the form's fee strategy.
pub fn plan(token: TokenType, balance: &str, strategy: FeeStrategy) -> EntireBalance {
    if !token.pays_own_fee() {
        return EntireBalance::Fill(balance.to_string());
    }

    if parse_float(balance) == 0.0 {
        return EntireBalance::Skip;
    }

    match strategy {
        FeeStrategy::Constant(fee) => match amount_after_fee(balance, fee) {
            Some(amount) => EntireBalance::Fill(amount),
            None => EntireBalance::Skip,
        },
        FeeStrategy::Gas => EntireBalance::FillThenSubtractFee(balance.to_string()),
    }
}

/// `balance - fee` using exact decimal subtraction.
pub fn amount_after_fee(balance: &str, fee: Decimal) -> Option<String> {
    let balance = Decimal::from_str(balance.trim()).ok()?;
    let amount = balance.checked_sub(fee)?;
    Some(amount.normalize().to_string())
}
