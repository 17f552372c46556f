use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tenderly_faucet_core::FaucetError;

/// Message used whenever a probe does not answer in time
pub const PROBE_TIMEOUT_MESSAGE: &str = "RPC validation timed out";

/// Reachability check for a JSON-RPC endpoint.
///
/// On failure the raw error text is returned untouched, so callers can look
/// for region hints in it.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Chain id reported by the endpoint
    async fn probe(&self, url: &str) -> Result<u64, String>;
}

/// Probe that sends `eth_chainId` over plain HTTP
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, FaucetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FaucetError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EndpointProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<u64, String> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_chainId",
            "params": [],
        });

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PROBE_TIMEOUT_MESSAGE.to_string()
                } else {
                    e.to_string()
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            return Err(if text.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                text
            });
        }

        parse_chain_id_response(&text)
    }
}

/// Chain id from an `eth_chainId` response body, or the error text it carries
pub fn parse_chain_id_response(text: &str) -> Result<u64, String> {
    let value: Value =
        serde_json::from_str(text).map_err(|_| format!("Unexpected response from RPC: {text}"))?;

    if let Some(error) = value.get("error") {
        return Err(error.to_string());
    }

    value
        .get("result")
        .and_then(Value::as_str)
        .and_then(|hex| u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok())
        .ok_or_else(|| "Missing chain id in RPC response".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_id_response() {
        assert_eq!(parse_chain_id_response(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#), Ok(1));
        assert_eq!(parse_chain_id_response(r#"{"jsonrpc":"2.0","id":1,"result":"0x14a34"}"#), Ok(84532));
    }

    #[test]
    fn test_parse_error_response_keeps_raw_error() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"wrong region","region":"us-east"}}"#;
        let err = parse_chain_id_response(body).unwrap_err();
        assert!(err.contains("wrong region"));
        assert!(err.contains("us-east"));
    }

    #[test]
    fn test_parse_garbage_response() {
        assert!(parse_chain_id_response("<html>bad gateway</html>").is_err());
        assert!(parse_chain_id_response(r#"{"jsonrpc":"2.0","id":1}"#).is_err());
    }
}
