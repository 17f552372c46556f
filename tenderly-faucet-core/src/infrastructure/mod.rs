//! Infrastructure layer
//!
//! Key/value storage backends used for the faucet's local persistence.

pub mod platform;

pub use platform::*;
