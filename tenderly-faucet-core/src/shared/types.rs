//! Shared data types
//!
//! Value types exchanged between the core, the service and the JSON API.

use crate::shared::constants::{SECONDS_PER_DAY, SECONDS_PER_SECOND, SECONDS_PER_WEEK};
use crate::shared::error::FaucetError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Balances of one address: ETH plus every preset token that could be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub eth: String,
    pub tokens: BTreeMap<String, String>,
}

/// ETH balance plus, optionally, the balance of a single token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBalances {
    pub eth: String,
    pub token: Option<String>,
    pub symbol: Option<String>,
}

/// Outcome of probing an RPC endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcValidationResult {
    pub is_valid: bool,
    pub corrected_url: Option<String>,
    pub error: Option<String>,
}

impl RpcValidationResult {
    pub fn valid(corrected_url: Option<String>) -> Self {
        Self {
            is_valid: true,
            corrected_url,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            corrected_url: None,
            error: Some(error.into()),
        }
    }
}

/// The persisted RPC connection.
///
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcCacheData {
    pub url: String,
    pub guid: Option<String>,
    pub region: String,
    pub last_validated: i64,
    pub last_used: i64,
}

impl RpcCacheData {
    /// Age since last validation exceeds `threshold_ms`
    pub fn is_stale_after(&self, threshold_ms: i64) -> bool {
        Utc::now().timestamp_millis().saturating_sub(self.last_validated) > threshold_ms
    }
}

/// Unit used when advancing the chain clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Days,
    Weeks,
}

impl TimeUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            TimeUnit::Seconds => SECONDS_PER_SECOND,
            TimeUnit::Days => SECONDS_PER_DAY,
            TimeUnit::Weeks => SECONDS_PER_WEEK,
        }
    }

    /// Convert `amount` of this unit to seconds
    pub fn to_seconds(&self, amount: u64) -> Result<u64, FaucetError> {
        amount
            .checked_mul(self.seconds())
            .ok_or_else(|| FaucetError::validation("Time advance is too large"))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
        }
    }

    pub fn all() -> [TimeUnit; 3] {
        [TimeUnit::Seconds, TimeUnit::Days, TimeUnit::Weeks]
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = FaucetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seconds" => Ok(TimeUnit::Seconds),
            "days" => Ok(TimeUnit::Days),
            "weeks" => Ok(TimeUnit::Weeks),
            other => Err(FaucetError::validation(format!("Unknown time unit: {}", other))),
        }
    }
}
