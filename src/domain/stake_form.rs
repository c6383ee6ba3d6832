//! Stake deposit form for the Theta network.
//!
//! The fee is a flat constant. The holder is checked by the rule of the stake
//! purpose, and a supplied guardian node delegate replaces the holder input.

use std::{str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{
    amount::filter_amount_chars,
    balance::{self, EntireBalance},
    chain::{AddressRules, StakingParams},
    descriptor::{Confirmation, ConfirmationExtras, ConfirmationKind, SubmissionGate, TransactionDescriptor},
    fee::FeeStrategy,
    form::{Effect, FeeUpdate, Field, TxForm},
    purpose::{GuardianNodeDelegate, Purpose},
    token::{TokenType, WalletContext},
    validation::{AmountPolicy, ValidationError, ValidityFlags},
};

pub const STAKE_TOKENS: [TokenType; 1] = [TokenType::Theta];

pub struct StakeForm {
    purpose: Purpose,
    token_type: TokenType,
    holder: String,
    amount: String,
    fee: Option<Decimal>,
    flags: ValidityFlags,
    guardian_node_delegate: Option<GuardianNodeDelegate>,
    params: StakingParams,
    wallet: WalletContext,
    rules: Arc<dyn AddressRules>,
    gate: SubmissionGate,
}

impl StakeForm {
    pub fn new(
        purpose: Purpose,
        default_token: Option<TokenType>,
        params: StakingParams,
        wallet: WalletContext,
        rules: Arc<dyn AddressRules>,
        gate: SubmissionGate,
    ) -> Self {
        let fee = FeeStrategy::Constant(params.transaction_fee).initial_fee();
        Self {
            purpose,
            token_type: default_token.unwrap_or(TokenType::Theta),
            holder: String::new(),
            amount: String::new(),
            fee,
            flags: ValidityFlags::default(),
            guardian_node_delegate: None,
            params,
            wallet,
            rules,
            gate,
        }
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn guardian_node_delegate(&self) -> Option<&GuardianNodeDelegate> {
        self.guardian_node_delegate.as_ref()
    }

    /// Supply or clear the guardian node delegate. The holder is revalidated
    /// against the new summary.
    pub fn set_guardian_node_delegate(&mut self, delegate: Option<GuardianNodeDelegate>) {
        self.guardian_node_delegate = delegate;
        self.validate_holder();
    }

    /// The holder input is hidden while a delegate is supplied.
    pub fn holder_input_visible(&self) -> bool {
        self.guardian_node_delegate.is_none()
    }

    /// Typed holder, falling back to the delegate's node summary.
    pub fn holder_summary(&self) -> &str {
        if !self.holder.is_empty() {
            return &self.holder;
        }
        self.guardian_node_delegate
            .as_ref()
            .map(|d| d.node_summary.as_str())
            .unwrap_or("")
    }

    pub fn minimum_stake(&self) -> Decimal {
        self.params.min_stake_amount(self.purpose)
    }

    pub fn descriptor(&self) -> TransactionDescriptor {
        TransactionDescriptor {
            token_type: self.token_type,
            from: self.wallet.address.clone(),
            to: self.holder_summary().to_string(),
            amount: self.amount.clone(),
            fee: self.fee,
            gas_price: None,
            gas_limit: None,
            purpose: Some(self.purpose),
        }
    }

    fn policy(&self) -> AmountPolicy {
        AmountPolicy::Stake {
            minimum: self.minimum_stake(),
        }
    }

    fn fee_strategy(&self) -> FeeStrategy {
        FeeStrategy::Constant(self.params.transaction_fee)
    }

    fn balance(&self) -> &str {
        self.wallet.balances.of(self.token_type)
    }

    fn set_amount(&mut self, amount: String) -> Vec<Effect> {
        self.amount = amount;
        self.validate_amount();
        Vec::new()
    }

    fn validate_holder(&mut self) {
        let summary = self.holder_summary().to_string();
        if summary.is_empty() {
            self.flags.set_recipient_valid(true);
        } else {
            let valid = self
                .purpose
                .holder_is_valid(self.rules.as_ref(), &self.holder, &summary);
            self.flags.set_recipient_valid(valid);
        }
    }

    fn validate_amount(&mut self) {
        if self.amount.is_empty() {
            self.flags.clear_amount();
        } else {
            let balance = self.balance().to_string();
            let policy = self.policy();
            self.flags.validate_amount(&self.amount, &balance, policy);
        }
    }
}

impl TxForm for StakeForm {
    fn token_type(&self) -> TokenType {
        self.token_type
    }

    fn token_choices(&self) -> &'static [TokenType] {
        &STAKE_TOKENS
    }

    fn recipient(&self) -> &str {
        &self.holder
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
        Vec::new()
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
                self.holder = raw.to_string();
                self.validate_holder();
                Vec::new()
            }
            Field::Amount => self.set_amount(filter_amount_chars(raw)),
        }
    }

    fn switch_token(&mut self, token: TokenType) -> Vec<Effect> {
        debug!("Switching stake token to {}", token);
        self.token_type = token;
        self.holder.clear();
        self.amount.clear();
        self.fee = self.fee_strategy().initial_fee();
        self.flags = ValidityFlags::default();
        Vec::new()
    }

    fn use_entire_balance(&mut self) -> Vec<Effect> {
        match balance::plan(self.token_type, self.balance(), self.fee_strategy()) {
            EntireBalance::Fill(amount) | EntireBalance::FillThenSubtractFee(amount) => {
                self.set_amount(amount)
            }
            EntireBalance::Skip => Vec::new(),
        }
    }

    fn apply(&mut self, update: FeeUpdate) -> Vec<Effect> {
        debug!("Stake form has a constant fee, ignoring {:?}", update);
        Vec::new()
    }

    fn is_valid(&self) -> bool {
        !self.holder_summary().is_empty() && !self.amount.is_empty() && !self.flags.any()
    }

    fn can_use_entire_balance(&self) -> bool {
        !self.holder_summary().is_empty() && !self.flags.invalid_recipient
    }

    fn recipient_error(&self) -> Option<ValidationError> {
        self.flags
            .invalid_recipient
            .then(|| self.purpose.holder_error())
    }

    fn amount_error(&self) -> Option<ValidationError> {
        self.flags.amount_error(self.policy())
    }

    fn submit(&self) -> bool {
        self.gate.submit(self.is_valid(), || Confirmation {
            kind: ConfirmationKind::DepositStake,
            transaction: self.descriptor(),
            extras: ConfirmationExtras {
                chain_id: Some(self.params.chain_id.clone()),
                guardian_node_delegate: self.guardian_node_delegate.clone(),
            },
        })
    }
}
