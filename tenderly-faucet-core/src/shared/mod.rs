//! Shared types, utilities, and constants
//!
//! Common building blocks used by the domain and by the faucet service.

pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

pub use constants::*;
pub use error::*;
pub use types::*;
pub use utils::*;
