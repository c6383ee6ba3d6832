//! Transfer form for Ethereum: native ETH or ERC20 THETA, with the fee
//! resolved from the network as gas price x gas limit.

use std::{str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{
    balance::{self, EntireBalance},
    chain::AddressRules,
    descriptor::{Confirmation, ConfirmationExtras, ConfirmationKind, SubmissionGate, TransactionDescriptor},
    fee::{FeeStrategy, GasQuery},
    form::{Effect, FeeUpdate, Field, TxForm},
    token::{TokenType, WalletContext},
    validation::{AmountPolicy, ValidationError, ValidityFlags},
};

pub const TRANSFER_TOKENS: [TokenType; 2] = [TokenType::Erc20Theta, TokenType::Ether];

pub struct TransferForm {
    token_type: TokenType,
    recipient: String,
    amount: String,
    fee: Option<Decimal>,
    gas_price: Option<Decimal>,
    gas_limit: Option<u64>,
    flags: ValidityFlags,
    pub show_fee_details: bool,
    network_error: Option<String>,
    /// Provisional amount written by the entire-balance shortcut, waiting for
    /// its fee to be subtracted.
    pending_entire_balance: Option<String>,
    /// Amount last written by the shortcut after a fee subtraction. Later
    /// estimates for it lower the amount again if the fee grew.
    entire_balance_amount: Option<String>,
    wallet: WalletContext,
    rules: Arc<dyn AddressRules>,
    gate: SubmissionGate,
}

impl TransferForm {
    pub fn new(wallet: WalletContext, rules: Arc<dyn AddressRules>, gate: SubmissionGate) -> Self {
        Self {
            token_type: TokenType::Erc20Theta,
            recipient: String::new(),
            amount: String::new(),
            fee: None,
            gas_price: None,
            gas_limit: None,
            flags: ValidityFlags::default(),
            show_fee_details: false,
            network_error: None,
            pending_entire_balance: None,
            entire_balance_amount: None,
            wallet,
            rules,
            gate,
        }
    }

    /// Work to start when the form is first shown.
    pub fn mount(&self) -> Vec<Effect> {
        vec![Effect::FetchGasPrice]
    }

    pub fn gas_price(&self) -> Option<Decimal> {
        self.gas_price
    }

    pub fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    pub fn toggle_fee_details(&mut self) {
        self.show_fee_details = !self.show_fee_details;
    }

    pub fn is_awaiting_entire_balance(&self) -> bool {
        self.pending_entire_balance.is_some()
    }

    pub fn descriptor(&self) -> TransactionDescriptor {
        TransactionDescriptor {
            token_type: self.token_type,
            from: self.wallet.address.clone(),
            to: self.recipient.clone(),
            amount: self.amount.clone(),
            fee: self.fee,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            purpose: None,
        }
    }

    fn balance(&self) -> &str {
        self.wallet.balances.of(self.token_type)
    }

    fn set_amount(&mut self, amount: String) -> Vec<Effect> {
        self.amount = amount;
        self.validate_amount();
        self.resolve_fee()
    }

    fn validate_recipient(&mut self) {
        if self.recipient.is_empty() {
            self.flags.set_recipient_valid(true);
        } else {
            let valid = self.rules.is_address(&self.recipient);
            self.flags.set_recipient_valid(valid);
        }
    }

    fn validate_amount(&mut self) {
        if self.amount.is_empty() {
            self.flags.clear_amount();
        } else {
            let balance = self.balance().to_string();
            self.flags
                .validate_amount(&self.amount, &balance, AmountPolicy::Transfer);
        }
    }

    /// Stage two of fee resolution. Only a valid form with a known gas price
    /// asks for an estimate; anything else has no fee.
    fn resolve_fee(&mut self) -> Vec<Effect> {
        if !self.is_valid() {
            self.fee = None;
            self.pending_entire_balance = None;
            return Vec::new();
        }

        let Some(gas_price) = self.gas_price else {
            debug!("Gas price unknown, fee stays unresolved");
            self.fee = None;
            return Vec::new();
        };

        vec![Effect::EstimateFee(GasQuery {
            token_type: self.token_type,
            to: self.recipient.clone(),
            from: self.wallet.address.clone(),
            amount: self.amount.clone(),
            gas_price,
        })]
    }

    /// Replace a shortcut amount with `balance - fee` when the fee no longer
    /// fits. The amount only goes down.
    fn finish_entire_balance(&mut self, query: &GasQuery, fee: Decimal) -> Vec<Effect> {
        if query.token_type != self.token_type || query.amount != self.amount {
            return Vec::new();
        }
        let from_shortcut = self.pending_entire_balance.as_deref() == Some(query.amount.as_str())
            || self.entire_balance_amount.as_deref() == Some(query.amount.as_str());
        if !from_shortcut {
            return Vec::new();
        }
        self.pending_entire_balance = None;

        let Some(amount) = balance::amount_after_fee(self.balance(), fee) else {
            warn!("Could not subtract fee {} from balance {}", fee, self.balance());
            return Vec::new();
        };
        let lower = match (Decimal::from_str(&amount), Decimal::from_str(self.amount.trim())) {
            (Ok(after_fee), Ok(current)) => after_fee < current,
            _ => false,
        };
        if !lower {
            return Vec::new();
        }

        debug!("Entire balance after fee {}: {}", fee, amount);
        self.entire_balance_amount = Some(amount.clone());
        self.set_amount(amount)
    }
}

impl TxForm for TransferForm {
    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn token_choices(&self) -> &'static [TokenType] {
        &TRANSFER_TOKENS
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }

    fn amount(&self) -> &str {
        &self.amount
    }

    fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    fn flags(&self) -> ValidityFlags {
        self.flags
    }

    fn wallet(&self) -> &WalletContext {
        &self.wallet
    }

    fn set_wallet(&mut self, wallet: WalletContext) -> Vec<Effect> {
        self.wallet = wallet;
        self.validate_amount();
        self.resolve_fee()
    }

    fn update(&mut self, field: Field, raw: &str) -> Vec<Effect> {
        match field {
            Field::TokenType => match TokenType::from_str(raw) {
                Ok(token) if self.token_choices().contains(&token) => self.switch_token(token),
                _ => {
                    warn!("Ignoring unsupported token type: {}", raw);
                    Vec::new()
                }
            },
            Field::Recipient => {
                self.recipient = raw.to_string();
                self.validate_recipient();
                self.resolve_fee()
            }
            Field::Amount => {
                self.pending_entire_balance = None;
                self.entire_balance_amount = None;
                self.set_amount(raw.to_string())
            }
        }
    }

    fn switch_token(&mut self, token: TokenType) -> Vec<Effect> {
        debug!("Switching transfer token to {}", token);
        // The price refresh goes out before the reset; its answer is accepted
        // whenever it lands.
        let effects = vec![Effect::FetchGasPrice];

        self.token_type = token;
        self.recipient.clear();
        self.amount.clear();
        self.fee = FeeStrategy::Gas.initial_fee();
        self.gas_price = None;
        self.gas_limit = None;
        self.flags = ValidityFlags::default();
        self.network_error = None;
        self.pending_entire_balance = None;
        self.entire_balance_amount = None;

        effects
    }

    fn use_entire_balance(&mut self) -> Vec<Effect> {
        match balance::plan(self.token_type, self.balance(), FeeStrategy::Gas) {
            EntireBalance::Skip => {
                debug!("Entire balance skipped for empty {} balance", self.token_type);
                Vec::new()
            }
            EntireBalance::Fill(amount) => {
                self.pending_entire_balance = None;
                self.entire_balance_amount = None;
                self.set_amount(amount)
            }
            EntireBalance::FillThenSubtractFee(amount) => {
                self.pending_entire_balance = Some(amount.clone());
                self.entire_balance_amount = None;
                self.set_amount(amount)
            }
        }
    }

    fn apply(&mut self, update: FeeUpdate) -> Vec<Effect> {
        match update {
            FeeUpdate::GasPrice(Ok(gas_price)) => {
                debug!("Gas price resolved: {} Gwei", gas_price);
                self.gas_price = Some(gas_price);
                self.network_error = None;
                self.validate_amount();
                self.resolve_fee()
            }
            FeeUpdate::GasPrice(Err(e)) => {
                warn!("Gas price lookup failed: {}", e);
                self.network_error = Some(e);
                Vec::new()
            }
            FeeUpdate::FeeEstimate {
                query,
                result: Ok(estimate),
            } => {
                self.network_error = None;
                if !self.is_valid() {
                    debug!("Discarding fee estimate for a form that is no longer valid");
                    self.fee = None;
                    return Vec::new();
                }
                self.gas_limit = Some(estimate.gas_limit);
                self.fee = Some(estimate.fee);
                self.finish_entire_balance(&query, estimate.fee)
            }
            FeeUpdate::FeeEstimate { result: Err(e), .. } => {
                warn!("Gas estimate failed: {}", e);
                self.network_error = Some(e);
                self.fee = None;
                self.pending_entire_balance = None;
                Vec::new()
            }
        }
    }

    fn is_valid(&self) -> bool {
        !self.recipient.is_empty() && !self.amount.is_empty() && !self.flags.any()
    }

    fn can_use_entire_balance(&self) -> bool {
        !self.recipient.is_empty() && !self.flags.invalid_recipient
    }

    fn recipient_error(&self) -> Option<ValidationError> {
        self.flags
            .invalid_recipient
            .then_some(ValidationError::InvalidAddress)
    }

    fn amount_error(&self) -> Option<ValidationError> {
        self.flags.amount_error(AmountPolicy::Transfer)
    }

    fn network_error(&self) -> Option<&str> {
        self.network_error.as_deref()
    }

    fn submit(&self) -> bool {
        self.gate.submit(self.is_valid(), || Confirmation {
            kind: ConfirmationKind::Send,
            transaction: self.descriptor(),
            extras: ConfirmationExtras::default(),
        })
    }
}
