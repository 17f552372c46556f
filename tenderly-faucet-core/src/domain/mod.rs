//! Domain layer
//!
//! Token descriptors and RPC endpoint rules for Tenderly Virtual TestNets.

pub mod entities;

pub use entities::*;
