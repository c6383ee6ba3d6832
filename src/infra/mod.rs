pub mod fee_tasks;
pub mod rpc;
pub mod simulated;
pub mod wallet;
