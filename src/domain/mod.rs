pub mod amount;
pub mod balance;
pub mod chain;
pub mod descriptor;
pub mod fee;
pub mod form;
pub mod purpose;
pub mod stake_form;
pub mod token;
pub mod transfer_form;
pub mod validation;
