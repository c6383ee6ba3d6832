//! Stake form end to end: constant fee, purpose rules and delegates.

use rust_decimal_macros::dec;
use tx_composer::domain::{
    descriptor::ConfirmationKind,
    form::{FeeUpdate, Field, TxForm},
    purpose::{GuardianNodeDelegate, Purpose},
    token::{Balances, TokenType},
    validation::ValidationError,
};

use super::{TestEnv, WALLET};

const VALIDATOR: &str = "0x80eab22e27d4b94511f5906484369b868d6552d2";

fn summary() -> String {
    format!("0x{}", "a1".repeat(229))
}

fn theta(balance: &str) -> Balances {
    Balances::new().with(TokenType::Theta, balance)
}

#[tokio::test]
async fn test_guardian_stake_reaches_confirmation() {
    let mut env = TestEnv::new();
    let mut form = env.stake_form(Purpose::StakeForGuardian, theta("5000"));

    let effects = form.update(Field::Recipient, &summary());
    env.run(&mut form, effects).await;
    let effects = form.update(Field::Amount, "1000");
    env.run(&mut form, effects).await;

    assert!(form.is_valid());
    assert_eq!(form.fee(), Some(dec!(0.000001)));
    assert!(form.submit());

    let sent = env.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, ConfirmationKind::DepositStake);
    assert_eq!(sent[0].transaction.from, WALLET);
    assert_eq!(sent[0].transaction.to, summary());
    assert_eq!(sent[0].transaction.purpose, Some(Purpose::StakeForGuardian));
    assert_eq!(sent[0].extras.chain_id.as_deref(), Some("mainnet"));
    assert_eq!(env.oracle.estimate_calls().len(), 0);
}

#[tokio::test]
async fn test_validator_holder_must_be_an_address() {
    let env = TestEnv::new();
    let mut form = env.stake_form(Purpose::StakeForValidator, theta("3000000"));

    assert!(form.update(Field::Recipient, &summary()).is_empty());
    assert_eq!(form.recipient_error(), Some(ValidationError::InvalidHolderAddress));
    assert!(!form.can_use_entire_balance());

    form.update(Field::Recipient, VALIDATOR);
    assert_eq!(form.recipient_error(), None);
    assert!(form.can_use_entire_balance());

    form.use_entire_balance();
    assert_eq!(form.amount(), "3000000");
    assert!(form.is_valid());
}

#[tokio::test]
async fn test_validator_stake_below_minimum_never_submits() {
    let env = TestEnv::new();
    let mut form = env.stake_form(Purpose::StakeForValidator, theta("3000000"));
    form.update(Field::Recipient, VALIDATOR);
    form.update(Field::Amount, "1999999.99");

    assert_eq!(
        form.amount_error().map(|e| e.to_string()).as_deref(),
        Some("Invalid amount. Must be at least 2,000,000 THETA")
    );
    assert!(!form.submit());
    assert!(env.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_delegate_summary_replaces_holder() {
    let env = TestEnv::new();
    let mut form = env.stake_form(Purpose::StakeForGuardian, theta("5000"));
    form.set_guardian_node_delegate(Some(GuardianNodeDelegate {
        node_summary: summary(),
    }));

    assert!(!form.holder_input_visible());
    form.update(Field::Amount, "1000");
    assert!(form.submit());

    let sent = env.notifier.sent();
    assert_eq!(sent[0].transaction.to, summary());
    assert_eq!(
        sent[0].extras.guardian_node_delegate,
        Some(GuardianNodeDelegate {
            node_summary: summary()
        })
    );
}

#[tokio::test]
async fn test_fee_updates_do_not_touch_the_constant_fee() {
    let env = TestEnv::new();
    let mut form = env.stake_form(Purpose::StakeForGuardian, theta("5000"));

    assert!(form.apply(FeeUpdate::GasPrice(Ok(dec!(500)))).is_empty());
    assert_eq!(form.fee(), Some(dec!(0.000001)));
}
