//! RPC endpoint rules for Tenderly Virtual TestNets
//!
//! A Virtual TestNet admin endpoint looks like
//! `https://virtual.mainnet[.<region>].rpc.tenderly.co/<guid>`.

use crate::shared::constants::DEFAULT_REGION;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GUID: Regex =
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap();
    static ref GUID_IN_URL: Regex =
        Regex::new(r"(?i)/([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})/?$").unwrap();
    static ref REGIONAL_HOST: Regex = Regex::new(r"virtual\.mainnet\.([^./]+)\.rpc\.tenderly\.co").unwrap();
    static ref TENDERLY_HOST: Regex = Regex::new(r"(?i)^https?://[^/]*\.rpc\.tenderly\.co(?:/|$)").unwrap();
    static ref REGION_FIELD: Regex =
        Regex::new(r#"(?i)region["'\s:=]+([a-z]{2,}-[a-z]+(?:-\d+)?)"#).unwrap();
}

/// Whole string is a GUID
pub fn is_guid(input: &str) -> bool {
    GUID.is_match(input.trim())
}

/// GUID at the end of an endpoint URL
pub fn extract_guid(url: &str) -> Option<String> {
    GUID_IN_URL
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Region label of a Tenderly host, `"default"` when the host has none
pub fn extract_region(url: &str) -> String {
    REGIONAL_HOST
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

pub fn is_tenderly_url(url: &str) -> bool {
    TENDERLY_HOST.is_match(url.trim())
}

/// Join base URL and GUID, dropping whitespace and a trailing slash on the base
pub fn build_url(base_url: &str, guid: &str) -> String {
    let clean_guid: String = guid.chars().filter(|c| !c.is_whitespace()).collect();
    let clean_base: String = base_url.chars().filter(|c| !c.is_whitespace()).collect();
    let clean_base = clean_base.strip_suffix('/').unwrap_or(&clean_base);
    format!("{}/{}", clean_base, clean_guid)
}

/// Endpoint of `guid` in a specific region
pub fn regional_url(region: &str, guid: &str) -> String {
    format!("https://virtual.mainnet.{}.rpc.tenderly.co/{}", region, guid)
}

/// Region named in a provider error, if any.
///
/// Tenderly answers a request sent to the wrong region with an error that
/// mentions the right one, either as a regional host or as a `region` field.
pub fn region_hint(error_text: &str) -> Option<String> {
    if let Some(caps) = REGIONAL_HOST.captures(error_text) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }
    REGION_FIELD
        .captures(error_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUID_SAMPLE: &str = "4249ff26-95dc-488b-8f35-a6ca53ecebb3";

    #[test]
    fn test_is_guid() {
        assert!(is_guid(GUID_SAMPLE));
        assert!(is_guid("4249FF26-95DC-488B-8F35-A6CA53ECEBB3"));
        assert!(is_guid(" 4249ff26-95dc-488b-8f35-a6ca53ecebb3 "));
        assert!(!is_guid("4249ff26-95dc-488b-8f35"));
        assert!(!is_guid("https://virtual.mainnet.rpc.tenderly.co/4249ff26-95dc-488b-8f35-a6ca53ecebb3"));
    }

    #[test]
    fn test_extract_guid() {
        let url = format!("https://virtual.mainnet.us-east.rpc.tenderly.co/{}", GUID_SAMPLE);
        assert_eq!(extract_guid(&url).as_deref(), Some(GUID_SAMPLE));
        assert_eq!(extract_guid(&format!("{}/", url)).as_deref(), Some(GUID_SAMPLE));
        assert_eq!(extract_guid("http://localhost:8545"), None);
    }

    #[test]
    fn test_extract_region() {
        assert_eq!(extract_region("https://virtual.mainnet.eu-central.rpc.tenderly.co/x"), "eu-central");
        assert_eq!(extract_region("https://virtual.mainnet.rpc.tenderly.co/x"), "default");
        assert_eq!(extract_region("http://localhost:8545"), "default");
    }

    #[test]
    fn test_is_tenderly_url() {
        assert!(is_tenderly_url("https://virtual.mainnet.rpc.tenderly.co/abc"));
        assert!(is_tenderly_url("https://virtual.mainnet.us-east.rpc.tenderly.co/abc"));
        assert!(!is_tenderly_url("https://rpc.tenderly.co.evil.example/abc"));
        assert!(!is_tenderly_url("http://localhost:8545"));
    }

    #[test]
    fn test_build_url() {
        let expected = format!("https://virtual.mainnet.rpc.tenderly.co/{}", GUID_SAMPLE);
        assert_eq!(build_url("https://virtual.mainnet.rpc.tenderly.co", GUID_SAMPLE), expected);
        assert_eq!(build_url("https://virtual.mainnet.rpc.tenderly.co/", GUID_SAMPLE), expected);
        assert_eq!(
            build_url(" https://virtual.mainnet.rpc.tenderly.co ", " 4249ff26-95dc-488b-8f35-a6ca53ecebb3\n"),
            expected
        );
    }

    #[test]
    fn test_region_hint() {
        let from_host = "Virtual TestNet lives in another region, use https://virtual.mainnet.us-east.rpc.tenderly.co/abc";
        assert_eq!(region_hint(from_host).as_deref(), Some("us-east"));

        let from_field = r#"{"error":{"message":"wrong region","region":"EU-Central"}}"#;
        assert_eq!(region_hint(from_field).as_deref(), Some("eu-central"));

        assert_eq!(region_hint("connection refused"), None);
        assert_eq!(region_hint("https://virtual.mainnet.rpc.tenderly.co/abc"), None);
    }

    #[test]
    fn test_regional_url() {
        assert_eq!(
            regional_url("us-east", GUID_SAMPLE),
            format!("https://virtual.mainnet.us-east.rpc.tenderly.co/{}", GUID_SAMPLE)
        );
    }
}
