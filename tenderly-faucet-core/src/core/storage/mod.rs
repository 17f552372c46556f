//! Local persistence
//!
//! Two slots: the last validated RPC endpoint and the list of saved recipient
//! addresses. Storage failures are logged and swallowed; losing either slot only
//! means the user has to type the value again.

use crate::domain::entities::endpoint::{extract_guid, extract_region};
use crate::infrastructure::platform::PlatformStorage;
use crate::shared::constants::{STORAGE_KEY_RPC_CACHE, STORAGE_KEY_SAVED_ADDRESSES};
use crate::shared::error::FaucetError;
use crate::shared::types::RpcCacheData;
use crate::shared::utils::current_timestamp_millis;
use std::sync::Arc;

/// Cache of the last validated RPC endpoint
#[derive(Clone)]
pub struct RpcCache {
    storage: Arc<dyn PlatformStorage>,
}

impl RpcCache {
    pub fn new(storage: Arc<dyn PlatformStorage>) -> Self {
        Self { storage }
    }

    /// Save `url` as the validated endpoint
    pub fn save(&self, url: &str) -> Option<RpcCacheData> {
        let now = current_timestamp_millis();
        let data = RpcCacheData {
            url: url.to_string(),
            guid: extract_guid(url),
            region: extract_region(url),
            last_validated: now,
            last_used: now,
        };

        match self.write(&data) {
            Ok(()) => {
                log::info!("Saved RPC to cache: guid={:?} region={}", data.guid, data.region);
                Some(data)
            }
            Err(e) => {
                log::error!("Failed to save RPC cache: {}", e);
                None
            }
        }
    }

    /// Load the cached endpoint and bump its `last_used` timestamp
    pub fn load(&self) -> Option<RpcCacheData> {
        let mut data = match self.read() {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to load RPC cache: {}", e);
                return None;
            }
        };

        data.last_used = current_timestamp_millis();
        if let Err(e) = self.write(&data) {
            log::error!("Failed to update RPC cache usage: {}", e);
        }

        log::info!(
            "Loaded RPC from cache: guid={:?} region={} last_validated={}",
            data.guid,
            data.region,
            chrono::DateTime::from_timestamp_millis(data.last_validated)
                .map(|t| t.to_rfc3339())
                .unwrap_or_default()
        );
        Some(data)
    }

    pub fn clear(&self) {
        match self.storage.delete(STORAGE_KEY_RPC_CACHE) {
            Ok(()) => log::info!("Cleared RPC cache"),
            Err(e) => log::error!("Failed to clear RPC cache: {}", e),
        }
    }

    /// Bump `last_used` without otherwise touching the entry
    pub fn touch(&self) {
        match self.read() {
            Ok(Some(mut data)) => {
                data.last_used = current_timestamp_millis();
                if let Err(e) = self.write(&data) {
                    log::error!("Failed to update RPC cache usage: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => log::error!("Failed to update RPC cache usage: {}", e),
        }
    }

    fn read(&self) -> Result<Option<RpcCacheData>, FaucetError> {
        if !self.storage.exists(STORAGE_KEY_RPC_CACHE)? {
            return Ok(None);
        }
        let bytes = self.storage.retrieve(STORAGE_KEY_RPC_CACHE)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn write(&self, data: &RpcCacheData) -> Result<(), FaucetError> {
        let bytes = serde_json::to_vec(data)?;
        self.storage.store(STORAGE_KEY_RPC_CACHE, &bytes)
    }
}

/// Saved recipient addresses, in insertion order, without duplicates.
///
/// Addresses are compared ignoring case and the `0x` prefix; the first
/// spelling saved is the one kept.
#[derive(Clone)]
pub struct AddressBook {
    storage: Arc<dyn PlatformStorage>,
}

impl AddressBook {
    pub fn new(storage: Arc<dyn PlatformStorage>) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Vec<String> {
        let exists = match self.storage.exists(STORAGE_KEY_SAVED_ADDRESSES) {
            Ok(exists) => exists,
            Err(e) => {
                log::error!("Failed to read saved addresses: {}", e);
                return Vec::new();
            }
        };
        if !exists {
            return Vec::new();
        }

        let parsed = self
            .storage
            .retrieve(STORAGE_KEY_SAVED_ADDRESSES)
            .and_then(|bytes| serde_json::from_slice::<Vec<String>>(&bytes).map_err(FaucetError::from));
        match parsed {
            Ok(addresses) => addresses,
            Err(e) => {
                log::error!("Failed to parse saved addresses: {}", e);
                Vec::new()
            }
        }
    }

    /// Append `address` unless it is already saved. Returns whether it was added.
    pub fn add(&self, address: &str) -> bool {
        let mut addresses = self.list();
        if addresses.iter().any(|saved| same_address(saved, address)) {
            return false;
        }
        addresses.push(address.to_string());
        self.persist(&addresses);
        true
    }

    pub fn remove(&self, address: &str) -> Vec<String> {
        let addresses: Vec<String> = self
            .list()
            .into_iter()
            .filter(|saved| !same_address(saved, address))
            .collect();
        self.persist(&addresses);
        addresses
    }

    fn persist(&self, addresses: &[String]) {
        let result = serde_json::to_vec(addresses)
            .map_err(FaucetError::from)
            .and_then(|bytes| self.storage.store(STORAGE_KEY_SAVED_ADDRESSES, &bytes));
        if let Err(e) = result {
            log::error!("Failed to save addresses: {}", e);
        }
    }
}

fn same_address(a: &str, b: &str) -> bool {
    let a = a.strip_prefix("0x").unwrap_or(a);
    let b = b.strip_prefix("0x").unwrap_or(b);
    a.eq_ignore_ascii_case(b)
}
