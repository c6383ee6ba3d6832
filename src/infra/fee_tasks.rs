//! Runs form effects against a fee oracle in the background.
//!
//! Each effect gets its own task. Completions are sent back over an unbounded
//! channel in whatever order they finish; the form decides which ones still
//! matter.

use std::sync::Arc;

use color_eyre::eyre::Result;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, warn};

use crate::domain::{
    chain::FeeOracle,
    fee::GasQuery,
    form::{Effect, FeeEstimate, FeeUpdate},
};

/// Spawn a task that runs `effect` and reports the outcome on `update_tx`.
pub fn spawn(
    effect: Effect,
    oracle: Arc<dyn FeeOracle>,
    update_tx: UnboundedSender<FeeUpdate>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let update = run(effect, oracle.as_ref()).await;
        if update_tx.send(update).is_err() {
            debug!("Fee update dropped: receiver closed");
        }
    })
}

/// Spawn one task per effect.
pub fn spawn_all(
    effects: Vec<Effect>,
    oracle: &Arc<dyn FeeOracle>,
    update_tx: &UnboundedSender<FeeUpdate>,
) {
    for effect in effects {
        spawn(effect, oracle.clone(), update_tx.clone());
    }
}

/// Run a single effect to completion.
pub async fn run(effect: Effect, oracle: &dyn FeeOracle) -> FeeUpdate {
    match effect {
        Effect::FetchGasPrice => {
            let result = oracle.get_gas_price().await.map_err(|e| {
                warn!("Gas price lookup failed: {:#}", e);
                format!("{e:#}")
            });
            FeeUpdate::GasPrice(result)
        }
        Effect::EstimateFee(query) => {
            let result = estimate(oracle, &query).await.map_err(|e| {
                warn!("Fee estimate for {} failed: {:#}", query.token_type, e);
                format!("{e:#}")
            });
            FeeUpdate::FeeEstimate { query, result }
        }
    }
}

async fn estimate(oracle: &dyn FeeOracle, query: &GasQuery) -> Result<FeeEstimate> {
    let gas_limit = oracle.estimate_gas(query).await?;
    let fee = oracle.get_transaction_fee(query.gas_price, gas_limit).await?;
    debug!(
        "Estimated {} gas at {} Gwei: {} ETH",
        gas_limit, query.gas_price, fee
    );
    Ok(FeeEstimate { gas_limit, fee })
}
