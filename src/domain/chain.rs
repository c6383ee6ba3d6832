//! Collaborator seams: address rules, fee lookups and staking parameters.

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{
    fee::{GasQuery, transaction_fee},
    purpose::Purpose,
};

/// Synchronous address format checks.
pub trait AddressRules: Send + Sync {
    fn is_address(&self, text: &str) -> bool;
    fn is_holder_summary(&self, text: &str) -> bool;
}

/// Network fee lookups. Gas prices are in Gwei, fees in ETH.
#[async_trait]
pub trait FeeOracle: Send + Sync {
    async fn get_gas_price(&self) -> Result<Decimal>;

    async fn estimate_gas(&self, query: &GasQuery) -> Result<u64>;

    async fn get_transaction_fee(&self, gas_price: Decimal, gas_limit: u64) -> Result<Decimal> {
        transaction_fee(gas_price, gas_limit)
            .ok_or_else(|| eyre!("Fee overflow: {} Gwei x {}", gas_price, gas_limit))
    }
}

/// Constants the stake form needs from the Theta network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    pub chain_id: String,
    /// Flat stake deposit fee, in TFuel.
    pub transaction_fee: Decimal,
    pub min_validator_stake: Decimal,
    pub min_guardian_stake: Decimal,
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            chain_id: "mainnet".to_string(),
            transaction_fee: dec!(0.000001),
            min_validator_stake: dec!(2000000),
            min_guardian_stake: dec!(1000),
        }
    }
}

impl StakingParams {
    pub fn min_stake_amount(&self, purpose: Purpose) -> Decimal {
        match purpose {
            Purpose::StakeForValidator => self.min_validator_stake,
            Purpose::StakeForGuardian => self.min_guardian_stake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOracle;

    #[async_trait]
    impl FeeOracle for FixedOracle {
        async fn get_gas_price(&self) -> Result<Decimal> {
            Ok(dec!(100))
        }

        async fn estimate_gas(&self, _query: &GasQuery) -> Result<u64> {
            Ok(21_000)
        }
    }

    #[tokio::test]
    async fn test_default_transaction_fee_is_exact() {
        let oracle = FixedOracle;
        let fee = oracle.get_transaction_fee(dec!(100), 21_000).await.unwrap();
        assert_eq!(fee, dec!(0.0021));
    }

    #[test]
    fn test_min_stake_per_purpose() {
        let params = StakingParams::default();
        assert_eq!(params.min_stake_amount(Purpose::StakeForValidator), dec!(2000000));
        assert_eq!(params.min_stake_amount(Purpose::StakeForGuardian), dec!(1000));
    }
}
