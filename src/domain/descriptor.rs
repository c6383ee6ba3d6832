//! Outbound transaction descriptors and the submission gate.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};

use super::{
    purpose::{GuardianNodeDelegate, Purpose},
    token::TokenType,
};

/// Everything the confirmation step needs to sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescriptor {
    pub token_type: TokenType,
    pub from: String,
    /// Recipient address, or the holder (address or summary) for stakes.
    pub to: String,
    /// Raw amount text as typed.
    pub amount: String,
    pub fee: Option<Decimal>,
    pub gas_price: Option<Decimal>,
    pub gas_limit: Option<u64>,
    pub purpose: Option<Purpose>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationExtras {
    pub chain_id: Option<String>,
    pub guardian_node_delegate: Option<GuardianNodeDelegate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmationKind {
    Send,
    DepositStake,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub kind: ConfirmationKind,
    pub transaction: TransactionDescriptor,
    pub extras: ConfirmationExtras,
}

/// Receives submitted transactions. Fire and forget: the form never waits on
/// the outcome.
pub trait ConfirmationNotifier: Send + Sync {
    fn show_confirmation(&self, confirmation: Confirmation);
}

/// Hands a descriptor to the notifier, but only for a valid form.
#[derive(Clone)]
pub struct SubmissionGate {
    notifier: Arc<dyn ConfirmationNotifier>,
}

impl SubmissionGate {
    pub fn new(notifier: Arc<dyn ConfirmationNotifier>) -> Self {
        Self { notifier }
    }

    /// Build and dispatch a confirmation if `valid`. Returns whether it was sent.
    pub fn submit(&self, valid: bool, build: impl FnOnce() -> Confirmation) -> bool {
        if !valid {
            debug!("Submission blocked: form is not valid");
            return false;
        }

        let confirmation = build();
        info!(
            "Requesting {} confirmation: {} {} to {}",
            confirmation.kind,
            confirmation.transaction.amount,
            confirmation.transaction.token_type,
            confirmation.transaction.to
        );
        self.notifier.show_confirmation(confirmation);
        true
    }
}
