//! Tx Composer - send and stake form state for a Theta/Ethereum wallet.
//!
//! This library provides:
//! - Transfer and stake forms with field validation and fee resolution
//! - Entire-balance calculation for fee-paying tokens
//! - Ethereum JSON-RPC gas lookups and an offline fee simulator
//! - Transaction descriptors handed to a confirmation step

pub mod config;
pub mod domain;
pub mod infra;
