//! Core faucet functionality
//!
//! Local persistence of the RPC connection cache and saved recipient addresses.

pub mod storage;

pub use storage::*;
