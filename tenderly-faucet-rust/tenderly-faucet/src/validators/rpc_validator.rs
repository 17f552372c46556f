use crate::infrastructure::blockchain::probe::{EndpointProbe, PROBE_TIMEOUT_MESSAGE};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tenderly_faucet_core::domain::entities::endpoint::{
    build_url, extract_guid, extract_region, is_guid, region_hint, regional_url,
};
use tenderly_faucet_core::RpcValidationResult;

const UNREACHABLE_MESSAGE: &str = "Invalid or unreachable RPC URL";

/// Validates RPC endpoints, retrying once in the region named by a failed probe
pub struct RpcValidator {
    probe: Arc<dyn EndpointProbe>,
    base_url: String,
    timeout: Duration,
}

impl RpcValidator {
    pub fn new(probe: Arc<dyn EndpointProbe>, base_url: &str, timeout: Duration) -> Self {
        Self {
            probe,
            base_url: base_url.to_string(),
            timeout,
        }
    }

    /// Endpoint URL for user input: a bare GUID is joined to the base URL,
    /// anything else is used as is
    pub fn resolve(&self, input: &str) -> String {
        let input = input.trim();
        if is_guid(input) {
            build_url(&self.base_url, input)
        } else {
            input.to_string()
        }
    }

    pub async fn validate(&self, input: &str) -> RpcValidationResult {
        let url = self.resolve(input);
        if url.is_empty() {
            return RpcValidationResult::invalid("RPC URL is required");
        }

        let first_error = match self.attempt(&url).await {
            Ok(chain_id) => {
                log::info!("RPC {} answered with chain id {}", url, chain_id);
                return RpcValidationResult::valid(None);
            }
            Err(e) => e,
        };

        if let Some(corrected) = corrected_url(&url, &first_error) {
            log::warn!("RPC region mismatch, retrying with {}", corrected);
            return match self.attempt(&corrected).await {
                Ok(chain_id) => {
                    log::info!("Corrected RPC {} answered with chain id {}", corrected, chain_id);
                    RpcValidationResult::valid(Some(corrected))
                }
                Err(e) => {
                    log::warn!("Corrected RPC {} failed: {}", corrected, e);
                    RpcValidationResult::invalid(extract_error_message(&e))
                }
            };
        }

        log::warn!("RPC validation failed for {}: {}", url, first_error);
        RpcValidationResult::invalid(extract_error_message(&first_error))
    }

    async fn attempt(&self, url: &str) -> Result<u64, String> {
        match tokio::time::timeout(self.timeout, self.probe.probe(url)).await {
            Ok(result) => result,
            Err(_) => Err(PROBE_TIMEOUT_MESSAGE.to_string()),
        }
    }
}

/// Regional URL to retry with, when `error_text` names a region other than the one in `url`
fn corrected_url(url: &str, error_text: &str) -> Option<String> {
    let guid = extract_guid(url)?;
    let hinted = region_hint(error_text)?;
    if hinted == extract_region(url) {
        return None;
    }
    Some(regional_url(&hinted, &guid))
}

/// Human-readable message out of a raw provider error.
///
/// JSON bodies contribute their `message` (top level or under `error`); any
/// other text is returned trimmed.
pub fn extract_error_message(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNREACHABLE_MESSAGE.to_string();
    }

    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.pointer("/error/message").and_then(Value::as_str))
        .or_else(|| value.get("error").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}
