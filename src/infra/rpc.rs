use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, eyre};
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    config::Config,
    domain::{
        chain::{AddressRules, FeeOracle},
        fee::GasQuery,
        token::TokenType,
    },
};

/// ERC20 `transfer(address,uint256)` selector.
const ERC20_TRANSFER_SELECTOR: &str = "a9059cbb";
const ETHER_DECIMALS: u32 = 18;
const GWEI_DECIMALS: u32 = 9;
/// Holder summary length in hex characters, without the 0x prefix.
const HOLDER_SUMMARY_HEX_LEN: usize = 458;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Ethereum JSON-RPC client wrapper.
pub struct RpcClient {
    client: reqwest::Client,
    config: Config,
}

impl RpcClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Get the RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.config.network.rpc_url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        debug!("RPC {} {}", method, params);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(self.rpc_url())
            .json(&body)
            .send()
            .await
            .wrap_err_with(|| format!("{method} request failed"))?
            .json::<RpcResponse<T>>()
            .await
            .wrap_err_with(|| format!("{method} returned malformed JSON"))?;

        if let Some(err) = response.error {
            return Err(eyre!("{} failed ({}): {}", method, err.code, err.message));
        }
        response
            .result
            .ok_or_else(|| eyre!("{} returned no result", method))
    }

    /// Build the `eth_estimateGas` call object for a transfer.
    ///
    /// No `gasPrice` is sent: with a fee cap the node requires
    /// `balance >= value + gas`, which an entire-balance estimate never meets.
    /// The price only enters the fee product.
    fn call_object(&self, query: &GasQuery) -> Result<Value> {
        let amount = to_base_units(&query.amount, ETHER_DECIMALS)?;

        match query.token_type {
            TokenType::Ether => Ok(json!({
                "from": query.from,
                "to": query.to,
                "value": format!("{amount:#x}"),
            })),
            TokenType::Erc20Theta => Ok(json!({
                "from": query.from,
                "to": self.config.network.theta_token_contract,
                "data": erc20_transfer_data(&query.to, amount)?,
            })),
            other => Err(eyre!("{} is not an Ethereum token", other)),
        }
    }
}

#[async_trait]
impl FeeOracle for RpcClient {
    async fn get_gas_price(&self) -> Result<Decimal> {
        let quantity: String = self.call("eth_gasPrice", json!([])).await?;
        let wei = parse_quantity(&quantity)?;
        wei_to_gwei(wei)
    }

    async fn estimate_gas(&self, query: &GasQuery) -> Result<u64> {
        let call = self.call_object(query)?;
        let quantity: String = self.call("eth_estimateGas", json!([call])).await?;
        let gas = parse_quantity(&quantity)?;
        u64::try_from(gas).wrap_err("Gas estimate does not fit in u64")
    }
}

/// Local address format rules for Ethereum addresses and Theta holder summaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainRules;

impl AddressRules for ChainRules {
    fn is_address(&self, text: &str) -> bool {
        let hex_part = strip_hex_prefix(text);
        hex_part.len() == 40 && hex::decode(hex_part).is_ok()
    }

    fn is_holder_summary(&self, text: &str) -> bool {
        let hex_part = strip_hex_prefix(text);
        hex_part.len() == HOLDER_SUMMARY_HEX_LEN && hex::decode(hex_part).is_ok()
    }
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

/// Parse a JSON-RPC hex quantity such as `0x5208`.
fn parse_quantity(quantity: &str) -> Result<u128> {
    let digits = strip_hex_prefix(quantity);
    if digits.is_empty() {
        return Err(eyre!("Empty quantity"));
    }
    u128::from_str_radix(digits, 16).wrap_err_with(|| format!("Invalid quantity: {quantity}"))
}

fn wei_to_gwei(wei: u128) -> Result<Decimal> {
    let wei = i128::try_from(wei).wrap_err("Gas price out of range")?;
    Decimal::try_from_i128_with_scale(wei, GWEI_DECIMALS)
        .map(|gwei| gwei.normalize())
        .map_err(|e| eyre!("Gas price out of range: {}", e))
}

/// Convert decimal text into integer base units with `decimals` fractional digits.
fn to_base_units(amount: &str, decimals: u32) -> Result<u128> {
    let amount = amount.trim();
    let (int_part, frac_part) = amount.split_once('.').unwrap_or((amount, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(eyre!("Empty amount"));
    }
    if frac_part.len() > decimals as usize {
        return Err(eyre!("Amount {} has more than {} decimals", amount, decimals));
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return Err(eyre!("Invalid amount: {}", amount));
    }

    let digits = format!("{int_part}{frac_part:0<width$}", width = decimals as usize);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<u128>()
        .wrap_err_with(|| format!("Amount {amount} is too large"))
}

fn erc20_transfer_data(to: &str, amount: u128) -> Result<String> {
    let address = hex::decode(strip_hex_prefix(to)).wrap_err("Recipient is not hex")?;
    if address.len() != 20 {
        return Err(eyre!("Recipient must be 20 bytes, got {}", address.len()));
    }
    Ok(format!(
        "0x{}{:0>64}{:064x}",
        ERC20_TRANSFER_SELECTOR,
        hex::encode(address),
        amount
    ))
}
