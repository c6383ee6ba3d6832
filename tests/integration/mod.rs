//! Integration tests for tx-composer.
//!
//! Drives the forms end to end through the background fee tasks:
//! - A scripted fee oracle with per-amount latency and failures
//! - A recording notifier standing in for the confirmation screen
//! - A settle loop that feeds every completion back into the form

pub mod stake_flow;
pub mod transfer_flow;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use tx_composer::{
    domain::{
        chain::{FeeOracle, StakingParams},
        descriptor::{Confirmation, ConfirmationNotifier, SubmissionGate},
        fee::GasQuery,
        form::{Effect, FeeUpdate, TxForm},
        purpose::Purpose,
        stake_form::StakeForm,
        token::{Balances, TokenType, WalletContext},
        transfer_form::TransferForm,
    },
    infra::{fee_tasks, rpc::ChainRules},
};

pub const WALLET: &str = "0x1111111111111111111111111111111111111111";
pub const RECIPIENT: &str = "0x2e833968e5bb786ae419c4d13189fb081cc43bab";

/// Fee oracle answering from a script.
pub struct ScriptedOracle {
    pub gas_price: Mutex<Result<Decimal, String>>,
    pub gas_by_token: HashMap<TokenType, u64>,
    /// Gas overrides for a given amount.
    pub gas_by_amount: Mutex<HashMap<String, u64>>,
    /// Extra latency for estimates of a given amount.
    pub delay_by_amount: Mutex<HashMap<String, Duration>>,
    pub fail_estimates: Mutex<bool>,
    pub estimate_calls: Mutex<Vec<GasQuery>>,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self {
            gas_price: Mutex::new(Ok(dec!(100))),
            gas_by_token: HashMap::from([(TokenType::Ether, 21_000), (TokenType::Erc20Theta, 60_000)]),
            gas_by_amount: Mutex::new(HashMap::new()),
            delay_by_amount: Mutex::new(HashMap::new()),
            fail_estimates: Mutex::new(false),
            estimate_calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedOracle {
    pub fn delay(&self, amount: &str, delay: Duration) {
        self.delay_by_amount
            .lock()
            .unwrap()
            .insert(amount.to_string(), delay);
    }

    pub fn gas_for_amount(&self, amount: &str, gas: u64) {
        self.gas_by_amount
            .lock()
            .unwrap()
            .insert(amount.to_string(), gas);
    }

    pub fn set_gas_price(&self, price: Result<Decimal, String>) {
        *self.gas_price.lock().unwrap() = price;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail_estimates.lock().unwrap() = failing;
    }

    pub fn estimate_calls(&self) -> Vec<GasQuery> {
        self.estimate_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeeOracle for ScriptedOracle {
    async fn get_gas_price(&self) -> Result<Decimal> {
        self.gas_price.lock().unwrap().clone().map_err(|e| eyre!(e))
    }

    async fn estimate_gas(&self, query: &GasQuery) -> Result<u64> {
        self.estimate_calls.lock().unwrap().push(query.clone());
        let delay = self
            .delay_by_amount
            .lock()
            .unwrap()
            .get(&query.amount)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_estimates.lock().unwrap() {
            return Err(eyre!("connection refused"));
        }
        if let Some(gas) = self.gas_by_amount.lock().unwrap().get(&query.amount) {
            return Ok(*gas);
        }
        self.gas_by_token
            .get(&query.token_type)
            .copied()
            .ok_or_else(|| eyre!("{} is not an Ethereum token", query.token_type))
    }
}

/// Notifier that records every confirmation.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Confirmation>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Confirmation> {
        self.sent.lock().unwrap().clone()
    }
}

impl ConfirmationNotifier for RecordingNotifier {
    fn show_confirmation(&self, confirmation: Confirmation) {
        self.sent.lock().unwrap().push(confirmation);
    }
}

/// Test environment wiring forms to the scripted oracle.
pub struct TestEnv {
    pub oracle: Arc<ScriptedOracle>,
    pub notifier: Arc<RecordingNotifier>,
    update_tx: UnboundedSender<FeeUpdate>,
    update_rx: UnboundedReceiver<FeeUpdate>,
    in_flight: usize,
}

impl TestEnv {
    pub fn new() -> Self {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        Self {
            oracle: Arc::new(ScriptedOracle::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            update_tx,
            update_rx,
            in_flight: 0,
        }
    }

    pub fn wallet(balances: Balances) -> WalletContext {
        WalletContext::new(WALLET, balances)
    }

    pub fn transfer_form(&self, balances: Balances) -> TransferForm {
        TransferForm::new(
            Self::wallet(balances),
            Arc::new(ChainRules),
            SubmissionGate::new(self.notifier.clone()),
        )
    }

    pub fn stake_form(&self, purpose: Purpose, balances: Balances) -> StakeForm {
        StakeForm::new(
            purpose,
            None,
            StakingParams::default(),
            Self::wallet(balances),
            Arc::new(ChainRules),
            SubmissionGate::new(self.notifier.clone()),
        )
    }

    /// Start effects without waiting for them.
    pub fn spawn(&mut self, effects: Vec<Effect>) {
        let oracle: Arc<dyn FeeOracle> = self.oracle.clone();
        self.in_flight += effects.len();
        fee_tasks::spawn_all(effects, &oracle, &self.update_tx);
    }

    /// Feed completions into `form` until no task is outstanding.
    pub async fn settle(&mut self, form: &mut dyn TxForm) {
        while self.in_flight > 0 {
            let update = tokio::time::timeout(Duration::from_secs(5), self.update_rx.recv())
                .await
                .expect("fee task timed out")
                .expect("fee channel closed");
            self.in_flight -= 1;
            let effects = form.apply(update);
            self.spawn(effects);
        }
    }

    /// Run `effects` and settle.
    pub async fn run(&mut self, form: &mut dyn TxForm, effects: Vec<Effect>) {
        self.spawn(effects);
        self.settle(form).await;
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
