use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use tx_composer::domain::{
    descriptor::{Confirmation, ConfirmationNotifier},
    form::Effect,
};

/// Actions that can be triggered by user input or internal events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    Help,
    ReloadWallet,

    // Tab switching
    TabTransfer,
    TabStake,

    /// Run a form effect against the fee oracle.
    Dispatch(Effect),
    ShowConfirmation(Box<Confirmation>),
    DismissConfirmation,
}

/// Forwards submitted transactions to the app as actions.
pub struct ActionNotifier {
    action_tx: UnboundedSender<Action>,
}

impl ActionNotifier {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }
}

impl ConfirmationNotifier for ActionNotifier {
    fn show_confirmation(&self, confirmation: Confirmation) {
        if self
            .action_tx
            .send(Action::ShowConfirmation(Box::new(confirmation)))
            .is_err()
        {
            debug!("Confirmation dropped: app is shutting down");
        }
    }
}
