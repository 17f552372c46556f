//! Tenderly Faucet Core
//!
//! Domain core for the Tenderly Virtual TestNet faucet.
//! Holds everything that does not need a live RPC connection.
//!
//! ## Architecture
//!
//! - **Core**: local persistence of the RPC connection cache and saved addresses
//! - **Domain**: token descriptors and RPC endpoint helpers
//! - **Shared**: common types, constants, errors and utilities
//! - **Infrastructure**: key/value storage backends (file, memory)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tenderly_faucet_core::{FileStorage, RpcCache};
//!
//! let storage = Arc::new(FileStorage::new("data").unwrap());
//! let cache = RpcCache::new(storage);
//! if let Some(entry) = cache.load() {
//!     println!("cached endpoint: {}", entry.url);
//! }
//! ```

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use crate::core::storage::{AddressBook, RpcCache};
pub use crate::domain::{preset_tokens, TokenDescriptor};
pub use crate::infrastructure::platform::{FileStorage, MemoryStorage, PlatformStorage};
pub use shared::error::FaucetError;
pub use shared::types::{AddressBalances, BalanceSnapshot, RpcCacheData, RpcValidationResult, TimeUnit};

/// Result alias used across the faucet crates
pub type Result<T> = std::result::Result<T, FaucetError>;
