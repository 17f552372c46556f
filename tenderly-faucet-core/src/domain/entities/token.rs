//! Token entity for the faucet

use crate::shared::constants::{ETH_ADDRESS, ETH_DECIMALS};
use crate::shared::utils::is_eth_address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default)]
    pub is_eth: bool,
}

impl TokenDescriptor {
    pub fn erc20(address: &str, symbol: &str, name: &str, decimals: u8) -> Self {
        Self {
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            is_eth: false,
        }
    }

    pub fn eth() -> Self {
        Self {
            address: ETH_ADDRESS.to_string(),
            symbol: "ETH".to_string(),
            name: "Ethereum".to_string(),
            decimals: ETH_DECIMALS,
            is_eth: true,
        }
    }

    /// Native ETH, either flagged or at the zero address
    pub fn is_native(&self) -> bool {
        self.is_eth || is_eth_address(&self.address)
    }
}

/// The tokens offered in the faucet's token selector
pub fn preset_tokens() -> Vec<TokenDescriptor> {
    vec![
        TokenDescriptor::eth(),
        TokenDescriptor::erc20(
            "0x57aB1E0003F623289CD798B1824Be09a793e4Bec",
            "reUSD",
            "reUSD Stablecoin",
            18,
        ),
        TokenDescriptor::erc20(
            "0x419905009e4656fdC02418C7Df35B1E61Ed5F726",
            "RSUP",
            "RSUP Governance Token",
            18,
        ),
        TokenDescriptor::erc20(
            "0x14361C243174794E2207296a6AD59bb0Dec1d388",
            "crvUSD-sDOLA",
            "Curve Lend - crvUSD sDOLA",
            18,
        ),
        TokenDescriptor::erc20(
            "0xaB3cb84c310186B2Fa4B4503624A5D90b5DcB22D",
            "frxUSD-sfrxETH",
            "Fraxlend - frxUSD sfrxETH",
            18,
        ),
        TokenDescriptor::erc20(
            "0xB6aF437ceEa0DBeA524115eFC905F0F44fd1eBAF",
            "Curve Pool: reUSD-sfrxUSD",
            "Curve Pool: reUSD-sfrxUSD",
            18,
        ),
        TokenDescriptor::erc20(
            "0xA6d9F4f3A67B35E81DFa560b0FcDE9B0751F1f53",
            "Curve Pool: reUSD-scrvUSD",
            "Curve Pool: reUSD-scrvUSD",
            18,
        ),
    ]
}

/// Look a token up by address, ignoring case
pub fn find_token<'a>(tokens: &'a [TokenDescriptor], address: &str) -> Option<&'a TokenDescriptor> {
    tokens
        .iter()
        .find(|token| token.address.eq_ignore_ascii_case(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_tokens_start_with_eth() {
        let tokens = preset_tokens();
        assert_eq!(tokens.len(), 7);
        assert!(tokens[0].is_native());
        assert_eq!(tokens[0].symbol, "ETH");
        assert!(tokens[1..].iter().all(|t| !t.is_native() && t.decimals == 18));
    }

    #[test]
    fn test_find_token_is_case_insensitive() {
        let tokens = preset_tokens();
        let found = find_token(&tokens, "0x57ab1e0003f623289cd798b1824be09a793e4bec").unwrap();
        assert_eq!(found.symbol, "reUSD");
        assert!(find_token(&tokens, "0x1111111111111111111111111111111111111111").is_none());
    }

    #[test]
    fn test_is_native_by_zero_address() {
        let token = TokenDescriptor::erc20(ETH_ADDRESS, "WETH?", "not flagged", 18);
        assert!(token.is_native());
    }
}
