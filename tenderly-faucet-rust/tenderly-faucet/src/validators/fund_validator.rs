use ethers::core::types::Address;
use serde::Deserialize;
use tenderly_faucet_core::domain::entities::token::find_token;
use tenderly_faucet_core::shared::utils::{is_eth_address, validate_ethereum_address};
use tenderly_faucet_core::{FaucetError, TokenDescriptor};

/// A balance-setting request as submitted by the form or the JSON API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundRequest {
    pub recipient: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub use_custom_token: bool,
    #[serde(default)]
    pub custom_token: Option<String>,
    pub amount: String,
}

/// What a validated request funds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundTarget {
    Eth,
    Preset(TokenDescriptor),
    /// Not in the token list; needs an on-chain ERC-20 check
    Custom(Address),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFund {
    pub recipient: Address,
    pub target: FundTarget,
    pub amount: String,
}

/// Checks that need no RPC round trip, in the order the form reports them
pub fn validate_fund_request(
    request: &FundRequest,
    tokens: &[TokenDescriptor],
) -> Result<ValidatedFund, FaucetError> {
    let recipient = request.recipient.trim();
    if recipient.is_empty() {
        return Err(FaucetError::validation("Address is required"));
    }
    let recipient = validate_ethereum_address(recipient).map_err(|_| FaucetError::validation("Invalid address"))?;

    let target = if request.use_custom_token {
        custom_target(request.custom_token.as_deref())?
    } else {
        preset_target(request.token.as_deref(), tokens)?
    };

    Ok(ValidatedFund {
        recipient,
        target,
        amount: request.amount.trim().to_string(),
    })
}

fn custom_target(custom_token: Option<&str>) -> Result<FundTarget, FaucetError> {
    let custom_token = custom_token.map(str::trim).unwrap_or_default();
    if is_eth_address(custom_token) {
        return Ok(FundTarget::Eth);
    }
    validate_ethereum_address(custom_token)
        .map(FundTarget::Custom)
        .map_err(|_| FaucetError::validation("Invalid custom token"))
}

fn preset_target(token: Option<&str>, tokens: &[TokenDescriptor]) -> Result<FundTarget, FaucetError> {
    let token = token.map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Err(FaucetError::validation("No token selected"));
    }

    match find_token(tokens, token) {
        Some(descriptor) if descriptor.is_native() => Ok(FundTarget::Eth),
        Some(descriptor) => Ok(FundTarget::Preset(descriptor.clone())),
        None if is_eth_address(token) => Ok(FundTarget::Eth),
        None => validate_ethereum_address(token)
            .map(FundTarget::Custom)
            .map_err(|_| FaucetError::validation("No token selected")),
    }
}
