//! Wallet address and balances loaded from a JSON file.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::{config::get_data_dir, domain::token::WalletContext};

/// Default wallet file inside the data directory.
pub fn default_wallet_path() -> PathBuf {
    get_data_dir().join("wallet.json")
}

/// Load the wallet file. A missing file yields an empty wallet.
pub fn load_wallet(path: &Path) -> Result<WalletContext> {
    if !path.exists() {
        info!("No wallet file at {}, starting empty", path.display());
        return Ok(WalletContext::default());
    }

    let data = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let wallet: WalletContext = serde_json::from_str(&data)
        .wrap_err_with(|| format!("Failed to parse {}", path.display()))?;
    info!(
        "Loaded wallet {} from {}",
        wallet.address,
        path.display()
    );
    Ok(wallet)
}

/// Write the wallet file, creating parent directories.
pub fn save_wallet(path: &Path, wallet: &WalletContext) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(wallet)?;
    std::fs::write(path, data).wrap_err_with(|| format!("Failed to write {}", path.display()))
}
