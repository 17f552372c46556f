//! In-memory RPC doubles shared by the unit tests

use crate::app::connection_service::ConnectionManager;
use crate::app::faucet_service::FaucetService;
use crate::infrastructure::blockchain::{EndpointProbe, FaucetRpc, RpcConnector};
use crate::validators::rpc_validator::RpcValidator;
use async_trait::async_trait;
use ethers::core::types::{Address, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tenderly_faucet_core::{preset_tokens, AddressBook, FaucetError, MemoryStorage, RpcCache};

pub const GUID: &str = "4249ff26-95dc-488b-8f35-a6ca53ecebb3";
pub const BASE: &str = "https://virtual.mainnet.rpc.tenderly.co";

pub fn default_url() -> String {
    format!("{BASE}/{GUID}")
}

pub fn regional(region: &str) -> String {
    format!("https://virtual.mainnet.{region}.rpc.tenderly.co/{GUID}")
}

/// Probe answering from a table; unknown URLs are rejected as an invalid TestNet
pub struct TableProbe {
    answers: HashMap<String, Result<u64, String>>,
}

impl TableProbe {
    pub fn accepting(urls: &[String]) -> Self {
        Self {
            answers: urls.iter().map(|url| (url.clone(), Ok(1))).collect(),
        }
    }

    pub fn with(mut self, url: String, answer: Result<u64, String>) -> Self {
        self.answers.insert(url, answer);
        self
    }
}

#[async_trait]
impl EndpointProbe for TableProbe {
    async fn probe(&self, url: &str) -> Result<u64, String> {
        self.answers
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(r#"{"message":"Invalid TestNet"}"#.to_string()))
    }
}

/// Hands out the same fake client for every endpoint
#[derive(Default)]
pub struct FakeConnector {
    pub rpc: Arc<FakeRpc>,
}

impl RpcConnector for FakeConnector {
    fn connect(&self, _url: &str) -> Result<Arc<dyn FaucetRpc>, FaucetError> {
        Ok(Arc::clone(&self.rpc) as Arc<dyn FaucetRpc>)
    }
}

pub fn manager_with(probe: TableProbe, cache: RpcCache) -> ConnectionManager {
    manager_with_rpc(probe, cache, Arc::new(FakeRpc::default()))
}

/// Faucet service over `rpc`, connected to the default endpoint when `connect` is set
pub async fn faucet_service(rpc: Arc<FakeRpc>, connect: bool) -> FaucetService {
    let storage = Arc::new(MemoryStorage::new());
    let manager = manager_with_rpc(
        TableProbe::accepting(&[default_url()]),
        RpcCache::new(storage.clone()),
        rpc,
    );
    if connect {
        manager.submit(GUID).await.unwrap();
    }
    FaucetService::new(
        Arc::new(manager),
        AddressBook::new(storage),
        preset_tokens(),
        Duration::from_millis(100),
        Duration::from_secs(5),
    )
}

pub fn manager_with_rpc(probe: TableProbe, cache: RpcCache, rpc: Arc<FakeRpc>) -> ConnectionManager {
    let validator = RpcValidator::new(Arc::new(probe), BASE, Duration::from_millis(200));
    ConnectionManager::new(
        validator,
        Arc::new(FakeConnector { rpc }),
        cache,
        BASE,
        24 * 60 * 60 * 1000,
    )
}

#[derive(Default)]
pub struct FakeRpc {
    eth: Mutex<HashMap<Address, U256>>,
    balances: Mutex<HashMap<(Address, Address), U256>>,
    erc20: HashMap<Address, (String, u8)>,
    multicall_fails: bool,
    eth_balance_fails: bool,
    admin_fails: bool,
    metadata_delay: Option<Duration>,
    timestamp: Mutex<u64>,
    pending_increase: Mutex<u64>,
    calls: Mutex<Vec<String>>,
}

impl FakeRpc {
    pub fn with_token(mut self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.erc20.insert(token, (symbol.to_string(), decimals));
        self
    }

    pub fn with_timestamp(self, timestamp: u64) -> Self {
        *self.timestamp.lock().unwrap() = timestamp;
        self
    }

    pub fn failing_multicall(mut self) -> Self {
        self.multicall_fails = true;
        self
    }

    pub fn failing_eth_balance(mut self) -> Self {
        self.eth_balance_fails = true;
        self
    }

    pub fn failing_admin(mut self) -> Self {
        self.admin_fails = true;
        self
    }

    pub fn slow_metadata(mut self, delay: Duration) -> Self {
        self.metadata_delay = Some(delay);
        self
    }

    pub fn eth_of(&self, owner: Address) -> U256 {
        self.eth.lock().unwrap().get(&owner).copied().unwrap_or_default()
    }

    pub fn token_of(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .lock()
            .unwrap()
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn admin(&self, method: &str) -> Result<(), FaucetError> {
        self.record(method);
        if self.admin_fails {
            return Err(FaucetError::rpc(format!("{method} failed: the method {method} does not exist")));
        }
        Ok(())
    }

    fn known(&self, token: Address) -> Result<&(String, u8), FaucetError> {
        self.erc20
            .get(&token)
            .ok_or_else(|| FaucetError::rpc("execution reverted"))
    }
}

#[async_trait]
impl FaucetRpc for FakeRpc {
    async fn eth_balance(&self, owner: Address) -> Result<U256, FaucetError> {
        self.record("eth_getBalance");
        if self.eth_balance_fails {
            return Err(FaucetError::rpc("eth_getBalance failed: 502 Bad Gateway"));
        }
        Ok(self.eth_of(owner))
    }

    async fn token_balances(&self, owner: Address, tokens: &[Address]) -> Result<Vec<Option<U256>>, FaucetError> {
        self.record("multicall");
        if self.multicall_fails {
            return Err(FaucetError::rpc("multicall reverted"));
        }
        Ok(tokens
            .iter()
            .map(|token| self.known(*token).ok().map(|_| self.token_of(*token, owner)))
            .collect())
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, FaucetError> {
        self.record("balanceOf");
        self.known(token)?;
        Ok(self.token_of(token, owner))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, FaucetError> {
        self.record("decimals");
        if let Some(delay) = self.metadata_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.known(token)?.1)
    }

    async fn token_symbol(&self, token: Address) -> Result<String, FaucetError> {
        self.record("symbol");
        if let Some(delay) = self.metadata_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.known(token)?.0.clone())
    }

    async fn set_balance(&self, owner: Address, wei: U256) -> Result<(), FaucetError> {
        self.admin("tenderly_setBalance")?;
        self.eth.lock().unwrap().insert(owner, wei);
        Ok(())
    }

    async fn set_erc20_balance(&self, token: Address, owner: Address, units: U256) -> Result<(), FaucetError> {
        self.admin("tenderly_setErc20Balance")?;
        self.balances.lock().unwrap().insert((token, owner), units);
        Ok(())
    }

    async fn mine(&self) -> Result<(), FaucetError> {
        self.admin("evm_mine")?;
        let increase = std::mem::take(&mut *self.pending_increase.lock().unwrap());
        *self.timestamp.lock().unwrap() += increase + 1;
        Ok(())
    }

    async fn increase_time(&self, seconds: u64) -> Result<(), FaucetError> {
        self.admin("evm_increaseTime")?;
        *self.pending_increase.lock().unwrap() += seconds;
        Ok(())
    }

    async fn latest_timestamp(&self) -> Result<Option<u64>, FaucetError> {
        self.record("eth_getBlockByNumber");
        Ok(Some(*self.timestamp.lock().unwrap()))
    }
}
