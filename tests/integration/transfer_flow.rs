//! Transfer form driven through the fee tasks.

use std::time::Duration;

use rust_decimal_macros::dec;
use tx_composer::{
    domain::{
        descriptor::ConfirmationKind,
        form::{Effect, FeeUpdate, Field, TxForm},
        token::{Balances, TokenType},
        validation::ValidationError,
    },
    infra::{fee_tasks, simulated::SimulatedNetwork},
};

use super::{RECIPIENT, TestEnv, WALLET};

fn ether(balance: &str) -> Balances {
    Balances::new().with(TokenType::Ether, balance)
}

#[tokio::test]
async fn test_entire_ether_balance_pays_its_own_fee() {
    let mut env = TestEnv::new();
    let mut form = env.transfer_form(ether("10.0"));

    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    assert_eq!(form.gas_price(), Some(dec!(100)));

    let effects = form.update(Field::Recipient, RECIPIENT);
    assert!(effects.is_empty());

    let effects = form.use_entire_balance();
    env.run(&mut form, effects).await;

    assert_eq!(form.amount(), "9.9979");
    assert_eq!(form.fee(), Some(dec!(0.0021)));
    assert_eq!(form.gas_limit(), Some(21_000));
    assert!(!form.is_awaiting_entire_balance());
    assert!(form.is_valid());

    // The first estimate was for the whole balance, the second for the remainder.
    let amounts: Vec<String> = env
        .oracle
        .estimate_calls()
        .into_iter()
        .map(|q| q.amount)
        .collect();
    assert_eq!(amounts, vec!["10.0".to_string(), "9.9979".to_string()]);

    assert!(form.submit());
    let sent = env.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, ConfirmationKind::Send);
    assert_eq!(sent[0].transaction.from, WALLET);
    assert_eq!(sent[0].transaction.to, RECIPIENT);
    assert_eq!(sent[0].transaction.amount, "9.9979");
    assert_eq!(sent[0].transaction.fee, Some(dec!(0.0021)));
}

#[tokio::test]
async fn test_entire_ether_balance_never_overdraws_when_gas_changes() {
    let mut env = TestEnv::new();
    env.oracle.gas_for_amount("9.9979", 30_000);
    let mut form = env.transfer_form(ether("10.0"));

    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    form.update(Field::Recipient, RECIPIENT);
    let effects = form.use_entire_balance();
    env.run(&mut form, effects).await;

    let amount: rust_decimal::Decimal = form.amount().parse().unwrap();
    let fee = form.fee().unwrap();
    assert!(amount + fee <= dec!(10.0), "{amount} + {fee} overdraws");
    assert_eq!(form.amount(), "9.997");
    assert!(form.is_valid());

    let amounts: Vec<String> = env
        .oracle
        .estimate_calls()
        .into_iter()
        .map(|q| q.amount)
        .collect();
    assert_eq!(amounts, vec!["10.0", "9.9979", "9.997"]);
}

#[tokio::test]
async fn test_entire_token_balance_keeps_full_amount() {
    let mut env = TestEnv::new();
    let mut form = env.transfer_form(Balances::new().with(TokenType::Erc20Theta, "250"));

    let effects = form.mount();
    env.run(&mut form, effects).await;
    form.update(Field::Recipient, RECIPIENT);
    let effects = form.use_entire_balance();
    env.run(&mut form, effects).await;

    assert_eq!(form.amount(), "250");
    assert_eq!(form.fee(), Some(dec!(0.006)));
    assert_eq!(env.oracle.estimate_calls().len(), 1);
}

#[tokio::test]
async fn test_last_completed_estimate_wins() {
    let mut env = TestEnv::new();
    env.oracle.delay("1", Duration::from_millis(150));
    env.oracle.gas_for_amount("1", 30_000);

    let mut form = env.transfer_form(ether("10"));
    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    form.update(Field::Recipient, RECIPIENT);

    let slow = form.update(Field::Amount, "1");
    env.spawn(slow);
    let fast = form.update(Field::Amount, "2");
    env.spawn(fast);
    env.settle(&mut form).await;

    assert_eq!(form.amount(), "2");
    assert_eq!(form.gas_limit(), Some(30_000));
    assert_eq!(form.fee(), Some(dec!(0.003)));
}

#[tokio::test]
async fn test_estimate_landing_on_invalid_form_is_dropped() {
    let mut env = TestEnv::new();
    env.oracle.delay("1", Duration::from_millis(100));

    let mut form = env.transfer_form(ether("10"));
    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    form.update(Field::Recipient, RECIPIENT);

    let effects = form.update(Field::Amount, "1");
    env.spawn(effects);
    let effects = form.update(Field::Amount, "100");
    assert!(effects.is_empty());
    env.settle(&mut form).await;

    assert_eq!(form.fee(), None);
    assert!(form.flags().insufficient_funds);
    assert_eq!(form.amount_error(), Some(ValidationError::InsufficientFunds));
    assert!(!form.submit());
    assert!(env.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_estimate_failure_reports_network_error() {
    let mut env = TestEnv::new();
    env.oracle.set_failing(true);

    let mut form = env.transfer_form(ether("10"));
    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    form.update(Field::Recipient, RECIPIENT);
    let effects = form.update(Field::Amount, "1");
    env.run(&mut form, effects).await;

    assert_eq!(form.fee(), None);
    assert!(form.network_error().unwrap().contains("connection refused"));
    assert!(!form.flags().any());

    // Recovers on the next edit once the network is back.
    env.oracle.set_failing(false);
    let effects = form.update(Field::Amount, "1.5");
    env.run(&mut form, effects).await;
    assert_eq!(form.fee(), Some(dec!(0.0021)));
    assert_eq!(form.network_error(), None);
}

#[tokio::test]
async fn test_unknown_gas_price_skips_estimates() {
    let mut env = TestEnv::new();
    env.oracle.set_gas_price(Err("rate limited".to_string()));

    let mut form = env.transfer_form(ether("10"));
    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    assert_eq!(form.gas_price(), None);
    assert_eq!(form.network_error(), Some("rate limited"));

    form.update(Field::Recipient, RECIPIENT);
    let effects = form.update(Field::Amount, "1");
    assert!(effects.is_empty());
    assert_eq!(form.fee(), None);
    assert!(env.oracle.estimate_calls().is_empty());
}

#[tokio::test]
async fn test_token_switch_during_estimate_discards_it() {
    let mut env = TestEnv::new();
    env.oracle.delay("1", Duration::from_millis(100));

    let mut form = env.transfer_form(ether("10").with(TokenType::Erc20Theta, "5"));
    let effects = form.switch_token(TokenType::Ether);
    env.run(&mut form, effects).await;
    form.update(Field::Recipient, RECIPIENT);
    let effects = form.update(Field::Amount, "1");
    env.spawn(effects);

    let effects = form.switch_token(TokenType::Erc20Theta);
    env.spawn(effects);
    env.settle(&mut form).await;

    assert_eq!(form.token_type(), TokenType::Erc20Theta);
    assert_eq!(form.amount(), "");
    assert_eq!(form.fee(), None);
    assert_eq!(form.gas_price(), Some(dec!(100)));
}

#[tokio::test]
async fn test_simulated_network_resolves_fee() {
    let network = SimulatedNetwork::new(dec!(20), Duration::ZERO);
    let env = TestEnv::new();
    let mut form = env.transfer_form(ether("1"));

    for effect in form.switch_token(TokenType::Ether) {
        let update = fee_tasks::run(effect, &network).await;
        assert!(form.apply(update).is_empty());
    }
    form.update(Field::Recipient, RECIPIENT);
    let effects = form.update(Field::Amount, "0.5");
    assert_eq!(effects.len(), 1);

    let update = fee_tasks::run(effects[0].clone(), &network).await;
    assert!(matches!(update, FeeUpdate::FeeEstimate { result: Ok(_), .. }));
    form.apply(update);
    assert_eq!(form.fee(), Some(dec!(0.00042)));
    assert!(matches!(effects[0], Effect::EstimateFee(_)));
}
