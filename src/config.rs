use std::path::PathBuf;

use directories::ProjectDirs;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::chain::StakingParams;

/// Get the data directory for the application.
pub fn get_data_dir() -> PathBuf {
    if let Ok(s) = std::env::var("TX_COMPOSER_DATA") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("com", "txcomposer", "tx-composer") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Get the config directory for the application.
pub fn get_config_dir() -> PathBuf {
    if let Ok(s) = std::env::var("TX_COMPOSER_CONFIG") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("com", "txcomposer", "tx-composer") {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

/// Ethereum endpoint used for gas price and gas estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    /// Empty for the offline preset.
    pub rpc_url: String,
    /// ERC20 THETA contract.
    pub theta_token_contract: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub staking: StakingParams,
}

impl Default for Config {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl Config {
    /// Create config from CLI args.
    pub fn new(network: &str, rpc_url: Option<&str>) -> Self {
        let mut config = Self::from_network(network);
        if let Some(url) = rpc_url {
            config.network.rpc_url = url.to_string();
        }
        config
    }

    pub fn mainnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "mainnet".to_string(),
                rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
                theta_token_contract: "0x3883f5e181fccaf8410fa61e12b59bad963fb645".to_string(),
            },
            staking: StakingParams::default(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "testnet".to_string(),
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
                theta_token_contract: "0x0000000000000000000000000000000000000000".to_string(),
            },
            staking: StakingParams {
                chain_id: "testnet".to_string(),
                ..StakingParams::default()
            },
        }
    }

    /// No RPC endpoint; fees come from the built-in simulator.
    pub fn offline() -> Self {
        Self {
            network: NetworkConfig {
                name: "offline".to_string(),
                rpc_url: String::new(),
                theta_token_contract: "0x0000000000000000000000000000000000000000".to_string(),
            },
            staking: StakingParams {
                chain_id: "privatenet".to_string(),
                transaction_fee: dec!(0.000001),
                ..StakingParams::default()
            },
        }
    }

    pub fn from_network(network: &str) -> Self {
        match network {
            "testnet" => Self::testnet(),
            "offline" => Self::offline(),
            _ => Self::mainnet(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.network.rpc_url.is_empty()
    }
}
