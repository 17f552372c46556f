//! Error handling for the faucet core
//!
//! This module defines the error type shared by the core and service crates.

use thiserror::Error;

/// Faucet error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaucetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FaucetError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an RPC error
    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc(message.into())
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a not-connected error
    pub fn not_connected(message: impl Into<String>) -> Self {
        Self::NotConnected(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The bare message, without the category prefix.
    ///
    /// This is what the form pages show to the user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::Validation(msg)
            | Self::Storage(msg)
            | Self::Network(msg)
            | Self::Rpc(msg)
            | Self::Connection(msg)
            | Self::NotConnected(msg)
            | Self::Timeout(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl From<std::io::Error> for FaucetError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for FaucetError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<ethers::utils::ConversionError> for FaucetError {
    fn from(err: ethers::utils::ConversionError) -> Self {
        Self::validation(format!("Invalid amount: {}", err))
    }
}
