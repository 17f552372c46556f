use async_trait::async_trait;
use ethers::{
    abi::{parse_abi, Abi},
    contract::{Contract, Multicall},
    core::types::{Address, BlockNumber, U256},
    providers::{Http, Middleware, Provider, ProviderError},
};
use lazy_static::lazy_static;
use serde_json::{json, Value};
use std::fmt::Display;
use std::sync::Arc;
use tenderly_faucet_core::shared::utils::to_quantity;
use tenderly_faucet_core::FaucetError;

lazy_static! {
    static ref ERC20_ABI: Abi = parse_abi(&[
        "function balanceOf(address owner) view returns (uint256)",
        "function decimals() view returns (uint8)",
        "function symbol() view returns (string)",
    ])
    .expect("ERC-20 ABI fragment must parse");
}

/// The RPC surface the faucet needs from a Virtual TestNet
#[async_trait]
pub trait FaucetRpc: Send + Sync {
    async fn eth_balance(&self, owner: Address) -> Result<U256, FaucetError>;

    /// `balanceOf(owner)` for every token in one aggregated call.
    ///
    /// Individual failures come back as `None`; an error means the aggregation
    /// itself failed.
    async fn token_balances(&self, owner: Address, tokens: &[Address]) -> Result<Vec<Option<U256>>, FaucetError>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, FaucetError>;

    async fn token_decimals(&self, token: Address) -> Result<u8, FaucetError>;

    async fn token_symbol(&self, token: Address) -> Result<String, FaucetError>;

    /// `tenderly_setBalance`
    async fn set_balance(&self, owner: Address, wei: U256) -> Result<(), FaucetError>;

    /// `tenderly_setErc20Balance`
    async fn set_erc20_balance(&self, token: Address, owner: Address, units: U256) -> Result<(), FaucetError>;

    /// `evm_mine`
    async fn mine(&self) -> Result<(), FaucetError>;

    /// `evm_increaseTime`
    async fn increase_time(&self, seconds: u64) -> Result<(), FaucetError>;

    /// Timestamp of the latest block, `None` when the node returns no block
    async fn latest_timestamp(&self) -> Result<Option<u64>, FaucetError>;
}

/// Builds an RPC client for a validated endpoint
pub trait RpcConnector: Send + Sync {
    fn connect(&self, url: &str) -> Result<Arc<dyn FaucetRpc>, FaucetError>;
}

fn rpc_error(err: impl Display) -> FaucetError {
    FaucetError::rpc(err.to_string())
}

/// ethers-backed client for a Tenderly Virtual TestNet admin endpoint
pub struct TenderlyClient {
    url: String,
    provider: Arc<Provider<Http>>,
    multicall_address: Address,
}

impl TenderlyClient {
    pub fn new(url: &str, multicall_address: Address) -> Result<Self, FaucetError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| FaucetError::connection(format!("Failed to create HTTP provider: {e}")))?;

        Ok(Self {
            url: url.to_string(),
            provider: Arc::new(provider),
            multicall_address,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn erc20(&self, token: Address) -> Contract<Provider<Http>> {
        Contract::new(token, ERC20_ABI.clone(), Arc::clone(&self.provider))
    }

    async fn send(&self, method: &str, params: Value) -> Result<Value, FaucetError> {
        log::debug!("RPC {} {}", method, params);
        self.provider
            .request::<_, Value>(method, params)
            .await
            .map_err(|e| match e {
                ProviderError::HTTPError(_) => FaucetError::network(format!("{method} failed: {e}")),
                _ => FaucetError::rpc(format!("{method} failed: {e}")),
            })
    }
}

#[async_trait]
impl FaucetRpc for TenderlyClient {
    async fn eth_balance(&self, owner: Address) -> Result<U256, FaucetError> {
        self.provider.get_balance(owner, None).await.map_err(rpc_error)
    }

    async fn token_balances(&self, owner: Address, tokens: &[Address]) -> Result<Vec<Option<U256>>, FaucetError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut multicall = Multicall::new(Arc::clone(&self.provider), Some(self.multicall_address))
            .await
            .map_err(rpc_error)?;

        for token in tokens {
            let call = self
                .erc20(*token)
                .method::<_, U256>("balanceOf", owner)
                .map_err(rpc_error)?;
            multicall.add_call(call, true);
        }

        let results = multicall.call_raw().await.map_err(rpc_error)?;
        Ok(results
            .into_iter()
            .map(|result| result.ok().and_then(|token| token.into_uint()))
            .collect())
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, FaucetError> {
        self.erc20(token)
            .method::<_, U256>("balanceOf", owner)
            .map_err(rpc_error)?
            .call()
            .await
            .map_err(rpc_error)
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, FaucetError> {
        self.erc20(token)
            .method::<_, u8>("decimals", ())
            .map_err(rpc_error)?
            .call()
            .await
            .map_err(rpc_error)
    }

    async fn token_symbol(&self, token: Address) -> Result<String, FaucetError> {
        self.erc20(token)
            .method::<_, String>("symbol", ())
            .map_err(rpc_error)?
            .call()
            .await
            .map_err(rpc_error)
    }

    async fn set_balance(&self, owner: Address, wei: U256) -> Result<(), FaucetError> {
        self.send("tenderly_setBalance", json!([owner, to_quantity(wei)])).await?;
        Ok(())
    }

    async fn set_erc20_balance(&self, token: Address, owner: Address, units: U256) -> Result<(), FaucetError> {
        self.send("tenderly_setErc20Balance", json!([token, owner, to_quantity(units)]))
            .await?;
        Ok(())
    }

    async fn mine(&self) -> Result<(), FaucetError> {
        self.send("evm_mine", json!([])).await?;
        Ok(())
    }

    async fn increase_time(&self, seconds: u64) -> Result<(), FaucetError> {
        self.send("evm_increaseTime", json!([to_quantity(U256::from(seconds))]))
            .await?;
        Ok(())
    }

    async fn latest_timestamp(&self) -> Result<Option<u64>, FaucetError> {
        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(rpc_error)?;
        Ok(block.map(|block| block.timestamp.low_u64()))
    }
}

/// Connector producing [`TenderlyClient`]s
pub struct TenderlyConnector {
    multicall_address: Address,
}

impl TenderlyConnector {
    pub fn new(multicall_address: &str) -> Result<Self, FaucetError> {
        let multicall_address = multicall_address
            .parse::<Address>()
            .map_err(|e| FaucetError::config(format!("Invalid multicall address: {e}")))?;
        Ok(Self { multicall_address })
    }
}

impl RpcConnector for TenderlyConnector {
    fn connect(&self, url: &str) -> Result<Arc<dyn FaucetRpc>, FaucetError> {
        let client = TenderlyClient::new(url, self.multicall_address)?;
        log::info!("Initialized provider for {}", client.url());
        Ok(Arc::new(client))
    }
}
