//! Offline fee oracle with fixed gas figures.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{chain::FeeOracle, fee::GasQuery, token::TokenType};

/// Gas for a plain Ether transfer.
pub const ETHER_TRANSFER_GAS: u64 = 21_000;
/// Gas for an ERC20 `transfer` call.
pub const TOKEN_TRANSFER_GAS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct SimulatedNetwork {
    /// Gwei.
    pub gas_price: Decimal,
    /// Delay before every answer.
    pub latency: Duration,
}

impl Default for SimulatedNetwork {
    fn default() -> Self {
        Self {
            gas_price: dec!(100),
            latency: Duration::from_millis(250),
        }
    }
}

impl SimulatedNetwork {
    pub fn new(gas_price: Decimal, latency: Duration) -> Self {
        Self { gas_price, latency }
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl FeeOracle for SimulatedNetwork {
    async fn get_gas_price(&self) -> Result<Decimal> {
        self.wait().await;
        Ok(self.gas_price)
    }

    async fn estimate_gas(&self, query: &GasQuery) -> Result<u64> {
        self.wait().await;
        match query.token_type {
            TokenType::Ether => Ok(ETHER_TRANSFER_GAS),
            TokenType::Erc20Theta => Ok(TOKEN_TRANSFER_GAS),
            other => Err(eyre!("{} is not an Ethereum token", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(token_type: TokenType) -> GasQuery {
        GasQuery {
            token_type,
            to: "0xto".to_string(),
            from: "0xfrom".to_string(),
            amount: "1".to_string(),
            gas_price: dec!(100),
        }
    }

    #[tokio::test]
    async fn test_simulated_estimates() {
        let network = SimulatedNetwork::new(dec!(100), Duration::ZERO);
        assert_eq!(network.get_gas_price().await.unwrap(), dec!(100));
        assert_eq!(network.estimate_gas(&query(TokenType::Ether)).await.unwrap(), 21_000);
        assert_eq!(
            network.estimate_gas(&query(TokenType::Erc20Theta)).await.unwrap(),
            60_000
        );
        assert!(network.estimate_gas(&query(TokenType::Theta)).await.is_err());

        let fee = network.get_transaction_fee(dec!(100), 21_000).await.unwrap();
        assert_eq!(fee, dec!(0.0021));
    }
}
