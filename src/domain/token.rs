use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Token types a form can operate on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenType {
    /// Native Ethereum coin; pays its own gas.
    Ether,
    /// THETA as an ERC20 token on Ethereum; gas is paid in ETH.
    Erc20Theta,
    /// Native THETA on the Theta network; the stake token.
    Theta,
    /// Native TFuel on the Theta network; pays Theta network fees.
    ThetaFuel,
}

impl TokenType {
    /// Display symbol used next to amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenType::Ether => "ETH",
            TokenType::Erc20Theta => "THETA (ERC20)",
            TokenType::Theta => "THETA",
            TokenType::ThetaFuel => "TFuel",
        }
    }

    /// Human readable name for the token selector.
    pub fn title(&self) -> &'static str {
        match self {
            TokenType::Ether => "Ethereum",
            TokenType::Erc20Theta => "ERC20 Theta",
            TokenType::Theta => "Theta",
            TokenType::ThetaFuel => "Theta Fuel",
        }
    }

    /// Whether the transaction fee for this token is deducted from its own balance.
    pub fn pays_own_fee(&self) -> bool {
        matches!(self, TokenType::Ether | TokenType::ThetaFuel)
    }
}

/// Balances by token type, as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(HashMap<TokenType, String>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: TokenType, balance: impl Into<String>) -> Self {
        self.0.insert(token, balance.into());
        self
    }

    /// Balance of `token`. A token with no entry reads as `"0"`.
    pub fn of(&self, token: TokenType) -> &str {
        self.0.get(&token).map(String::as_str).unwrap_or("0")
    }
}

/// Read-only wallet data supplied to a form on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletContext {
    pub address: String,
    #[serde(default)]
    pub balances: Balances,
}

impl WalletContext {
    pub fn new(address: impl Into<String>, balances: Balances) -> Self {
        Self {
            address: address.into(),
            balances,
        }
    }
}
