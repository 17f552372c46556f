use crate::app::connection_service::ConnectionManager;
use crate::app::form_state::{FormAction, FormState, TimestampFormState};
use crate::infrastructure::blockchain::FaucetRpc;
use crate::utils::flash::Notices;
use crate::validators::fund_validator::{validate_fund_request, FundRequest, FundTarget};
use ethers::core::types::{Address, U256};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tenderly_faucet_core::shared::constants::{ETH_ADDRESS, ETH_DECIMALS};
use tenderly_faucet_core::shared::utils::{format_balance, is_eth_address, parse_amount, validate_ethereum_address};
use tenderly_faucet_core::{
    AddressBalances, AddressBook, BalanceSnapshot, FaucetError, TimeUnit, TokenDescriptor,
};

const SUCCESS_MESSAGE: &str = "Success";

/// Result of a successful fund request.
///
/// `balances` is `None` when the refresh after funding failed.
#[derive(Debug, Clone, Serialize)]
pub struct FundOutcome {
    pub message: String,
    pub balances: Option<BalanceSnapshot>,
}

/// Result of advancing the chain clock
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    pub advanced_seconds: u64,
    pub timestamp: u64,
}

/// Balance and timestamp operations against the active connection
pub struct FaucetService {
    connections: Arc<ConnectionManager>,
    addresses: AddressBook,
    tokens: Vec<TokenDescriptor>,
    token_validation_timeout: Duration,
    form: Mutex<FormState>,
    timestamp_form: Mutex<TimestampFormState>,
    pub form_notices: Notices,
    pub timestamp_notices: Notices,
}

impl FaucetService {
    pub fn new(
        connections: Arc<ConnectionManager>,
        addresses: AddressBook,
        tokens: Vec<TokenDescriptor>,
        token_validation_timeout: Duration,
        message_duration: Duration,
    ) -> Self {
        let default_token = tokens
            .first()
            .map(|token| token.address.clone())
            .unwrap_or_else(|| ETH_ADDRESS.to_string());
        Self {
            connections,
            addresses,
            tokens,
            token_validation_timeout,
            form: Mutex::new(FormState::new(&default_token)),
            timestamp_form: Mutex::new(TimestampFormState::default()),
            form_notices: Notices::new(message_duration),
            timestamp_notices: Notices::new(message_duration),
        }
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn tokens(&self) -> &[TokenDescriptor] {
        &self.tokens
    }

    pub fn form(&self) -> FormState {
        self.form_lock().clone()
    }

    pub fn timestamp_form(&self) -> TimestampFormState {
        self.timestamp_form
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply form actions, clearing stale notices when an input changed
    pub fn dispatch(&self, actions: Vec<FormAction>) {
        let changed = {
            let mut form = self.form_lock();
            let (next, changed) = form.clone().reduce_all(actions);
            *form = next;
            changed
        };
        if changed {
            self.form_notices.clear();
        }
    }

    pub fn saved_addresses(&self) -> Vec<String> {
        self.addresses.list()
    }

    pub fn save_address(&self, address: &str) -> Result<bool, FaucetError> {
        let address = address.trim();
        validate_ethereum_address(address)?;
        Ok(self.addresses.add(address))
    }

    pub fn remove_address(&self, address: &str) -> Vec<String> {
        self.addresses.remove(address.trim())
    }

    /// ETH and every preset ERC-20 balance of `address`.
    ///
    /// The address is remembered in the address book once it validates.
    pub async fn get_all_balances(&self, address: &str) -> Result<BalanceSnapshot, FaucetError> {
        let address = address.trim();
        let owner = validate_ethereum_address(address)?;
        let client = self.connections.client().await?;
        self.addresses.add(address);

        let eth = client.eth_balance(owner).await?;
        let mut snapshot = BalanceSnapshot {
            eth: format_balance(eth, ETH_DECIMALS),
            ..BalanceSnapshot::default()
        };

        let erc20: Vec<(&TokenDescriptor, Address)> = self
            .tokens
            .iter()
            .filter(|token| !token.is_native())
            .filter_map(|token| match token.address.parse::<Address>() {
                Ok(parsed) => Some((token, parsed)),
                Err(_) => {
                    log::warn!("Skipping token {} with malformed address {}", token.symbol, token.address);
                    None
                }
            })
            .collect();
        if erc20.is_empty() {
            return Ok(snapshot);
        }

        let token_addresses: Vec<Address> = erc20.iter().map(|(_, parsed)| *parsed).collect();
        let reads = match client.token_balances(owner, &token_addresses).await {
            Ok(reads) => reads,
            Err(e) => {
                log::warn!("Multicall failed, reading balances one by one: {}", e);
                sequential_balances(client.as_ref(), owner, &token_addresses).await
            }
        };
        if reads.len() != token_addresses.len() {
            return Err(FaucetError::internal(format!(
                "Expected {} token balances, got {}",
                token_addresses.len(),
                reads.len()
            )));
        }

        for ((token, _), balance) in erc20.iter().zip(reads) {
            match balance {
                Some(balance) => {
                    snapshot
                        .tokens
                        .insert(token.symbol.clone(), format_balance(balance, token.decimals));
                }
                None => log::debug!("No balance for {} at {}", token.symbol, address),
            }
        }
        Ok(snapshot)
    }

    /// ETH balance of `address` plus the balance of one token
    pub async fn get_address_balances(
        &self,
        address: &str,
        token: Option<&str>,
    ) -> Result<AddressBalances, FaucetError> {
        let owner = validate_ethereum_address(address.trim())?;
        let client = self.connections.client().await?;
        let eth = format_balance(client.eth_balance(owner).await?, ETH_DECIMALS);

        let token = match token.map(str::trim).filter(|t| !t.is_empty() && !is_eth_address(t)) {
            Some(token) => validate_ethereum_address(token)
                .map_err(|_| FaucetError::validation("Invalid token address"))?,
            None => {
                return Ok(AddressBalances {
                    eth,
                    token: None,
                    symbol: None,
                })
            }
        };

        let (balance, decimals, symbol) = tokio::try_join!(
            client.token_balance(token, owner),
            client.token_decimals(token),
            client.token_symbol(token),
        )?;
        Ok(AddressBalances {
            eth,
            token: Some(format_balance(balance, decimals)),
            symbol: Some(symbol),
        })
    }

    /// Read `decimals()` and `symbol()` of an ERC-20 contract under the token timeout
    pub async fn validate_token(&self, token: &str) -> Result<TokenDescriptor, FaucetError> {
        let token = token.trim();
        let address = validate_ethereum_address(token).map_err(|_| FaucetError::validation("Invalid token address"))?;
        if address.is_zero() {
            return Err(FaucetError::validation("The zero address is not an ERC-20 token"));
        }
        let client = self.connections.client().await?;
        let (decimals, symbol) = self.token_metadata(client.as_ref(), address).await?;
        Ok(TokenDescriptor::erc20(token, &symbol, &symbol, decimals))
    }

    pub async fn is_valid_erc20(&self, token: &str) -> bool {
        match self.validate_token(token).await {
            Ok(_) => true,
            Err(e) => {
                log::debug!("{} is not a usable ERC-20 token: {}", token, e);
                false
            }
        }
    }

    async fn token_metadata(&self, client: &dyn FaucetRpc, token: Address) -> Result<(u8, String), FaucetError> {
        let metadata = async { tokio::try_join!(client.token_decimals(token), client.token_symbol(token)) };
        match tokio::time::timeout(self.token_validation_timeout, metadata).await {
            Ok(Ok(metadata)) => Ok(metadata),
            Ok(Err(e)) => Err(FaucetError::validation(format!("Not an ERC-20 token: {}", e))),
            Err(_) => Err(FaucetError::timeout("Token validation timed out")),
        }
    }

    pub async fn set_eth_balance(&self, address: &str, amount: &str) -> Result<(), FaucetError> {
        let owner = validate_ethereum_address(address.trim())?;
        let wei = parse_amount(amount, ETH_DECIMALS)?;
        let client = self.connections.client().await?;
        client.set_balance(owner, wei).await
    }

    pub async fn set_token_balance(
        &self,
        token: &str,
        address: &str,
        amount: &str,
        decimals: u8,
    ) -> Result<(), FaucetError> {
        let token = validate_ethereum_address(token.trim()).map_err(|_| FaucetError::validation("Invalid token address"))?;
        let owner = validate_ethereum_address(address.trim())?;
        let units = parse_amount(amount, decimals)?;
        let client = self.connections.client().await?;
        client.set_erc20_balance(token, owner, units).await
    }

    /// Handle a submitted fund form: remember its inputs, set the balance and
    /// report the outcome through the form notices
    pub async fn fund(&self, request: &FundRequest) -> Result<FundOutcome, FaucetError> {
        self.dispatch(FormAction::from_request(request));
        self.dispatch(vec![FormAction::SetLoading(true)]);

        let result = self.apply_fund(request).await;

        self.dispatch(vec![FormAction::SetLoading(false)]);
        match &result {
            Ok(_) => {
                self.form_notices.error.clear();
                self.form_notices.success.show(SUCCESS_MESSAGE);
            }
            Err(e) => {
                log::error!("Fund request failed: {}", e);
                self.form_notices.success.clear();
                self.form_notices.error.show(e.user_message());
            }
        }
        result
    }

    async fn apply_fund(&self, request: &FundRequest) -> Result<FundOutcome, FaucetError> {
        let validated = validate_fund_request(request, &self.tokens)?;
        let client = self.connections.client().await?;
        let recipient = validated.recipient;

        match validated.target {
            FundTarget::Eth => {
                let wei = parse_amount(&validated.amount, ETH_DECIMALS)?;
                log::info!("Setting ETH balance of {:?} to {} wei", recipient, wei);
                client.set_balance(recipient, wei).await?;
            }
            FundTarget::Preset(token) => {
                let address = token
                    .address
                    .parse::<Address>()
                    .map_err(|_| FaucetError::config(format!("Malformed address for {}", token.symbol)))?;
                let units = parse_amount(&validated.amount, token.decimals)?;
                log::info!("Setting {} balance of {:?} to {}", token.symbol, recipient, units);
                client.set_erc20_balance(address, recipient, units).await?;
            }
            FundTarget::Custom(address) => {
                let decimals = match self.token_metadata(client.as_ref(), address).await {
                    Ok((decimals, _)) => decimals,
                    Err(e) => {
                        log::warn!("Custom token {:?} rejected: {}", address, e);
                        return Err(FaucetError::validation("Invalid custom token"));
                    }
                };
                let units = parse_amount(&validated.amount, decimals)?;
                log::info!("Setting custom token {:?} balance of {:?} to {}", address, recipient, units);
                client.set_erc20_balance(address, recipient, units).await?;
            }
        }

        // The balance was set; a failed refresh does not undo that
        let balances = match self.get_all_balances(&request.recipient).await {
            Ok(balances) => Some(balances),
            Err(e) => {
                log::warn!("Balance refresh after funding {:?} failed: {}", recipient, e);
                None
            }
        };
        Ok(FundOutcome {
            message: SUCCESS_MESSAGE.to_string(),
            balances,
        })
    }

    /// Latest block timestamp after mining a fresh block, if the network answers
    pub async fn current_timestamp(&self) -> Option<u64> {
        let client = self.connections.client().await.ok()?;
        let result = async {
            client.mine().await?;
            client.latest_timestamp().await
        }
        .await;
        match result {
            Ok(timestamp) => timestamp,
            Err(e) => {
                log::warn!("Could not read block timestamp: {}", e);
                None
            }
        }
    }

    /// Move the chain clock forward by `amount` units and mine a block
    pub async fn advance_timestamp(&self, amount: u64, unit: TimeUnit) -> Result<AdvanceOutcome, FaucetError> {
        self.set_timestamp_form(|form| {
            form.advance_amount = amount;
            form.time_unit = unit;
            form.loading = true;
        });
        self.timestamp_notices.clear();

        let result = self.apply_advance(amount, unit).await;

        self.set_timestamp_form(|form| form.loading = false);
        match &result {
            Ok(outcome) => {
                log::info!("Advanced chain clock by {}s to {}", outcome.advanced_seconds, outcome.timestamp);
                self.timestamp_notices
                    .success
                    .show(format!("Advanced by {} {}", amount, unit));
            }
            Err(e) => {
                log::error!("Timestamp advance failed: {}", e);
                self.timestamp_notices.error.show(e.user_message());
            }
        }
        result
    }

    async fn apply_advance(&self, amount: u64, unit: TimeUnit) -> Result<AdvanceOutcome, FaucetError> {
        if amount == 0 {
            return Err(FaucetError::validation("Amount must be greater than zero"));
        }
        let seconds = unit.to_seconds(amount)?;
        let client = self.connections.client().await?;

        let advanced = async {
            client.increase_time(seconds).await?;
            client.mine().await
        }
        .await;
        if let Err(e) = advanced {
            log::error!("evm_increaseTime/evm_mine failed: {}", e);
            return Err(FaucetError::rpc("Failed to advance timestamp"));
        }

        let timestamp = client
            .latest_timestamp()
            .await
            .ok()
            .flatten()
            .ok_or_else(|| FaucetError::rpc("Failed to fetch block data"))?;
        Ok(AdvanceOutcome {
            advanced_seconds: seconds,
            timestamp,
        })
    }

    fn form_lock(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_timestamp_form(&self, update: impl FnOnce(&mut TimestampFormState)) {
        update(&mut *self.timestamp_form.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

async fn sequential_balances(client: &dyn FaucetRpc, owner: Address, tokens: &[Address]) -> Vec<Option<U256>> {
    let mut balances = Vec::with_capacity(tokens.len());
    for token in tokens {
        let balance = match client.token_balance(*token, owner).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                log::warn!("balanceOf {:?} failed: {}", token, e);
                None
            }
        };
        balances.push(balance);
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{faucet_service, FakeRpc};

    const RECIPIENT: &str = "0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b6";
    const REUSD: &str = "0x57aB1E0003F623289CD798B1824Be09a793e4Bec";
    const CUSTOM: &str = "0x1111111111111111111111111111111111111111";

    fn addr(value: &str) -> Address {
        value.parse().unwrap()
    }

    async fn connected(rpc: FakeRpc) -> (FaucetService, Arc<FakeRpc>) {
        let rpc = Arc::new(rpc);
        (faucet_service(Arc::clone(&rpc), true).await, rpc)
    }

    fn fund_request(token: &str, amount: &str) -> FundRequest {
        FundRequest {
            recipient: RECIPIENT.to_string(),
            token: Some(token.to_string()),
            amount: amount.to_string(),
            ..FundRequest::default()
        }
    }

    #[tokio::test]
    async fn test_fund_eth() {
        let (service, rpc) = connected(FakeRpc::default()).await;
        let outcome = service.fund(&fund_request(ETH_ADDRESS, "1.5")).await.unwrap();

        assert_eq!(outcome.message, "Success");
        assert_eq!(outcome.balances.as_ref().unwrap().eth, "1.5");
        assert_eq!(rpc.eth_of(addr(RECIPIENT)), U256::from(1_500_000_000_000_000_000u64));
        assert_eq!(service.form_notices.success.current().as_deref(), Some("Success"));
        assert!(!service.form().loading);
        assert_eq!(service.form().amount, "1.5");
    }

    #[tokio::test]
    async fn test_fund_preset_token() {
        let (service, rpc) = connected(FakeRpc::default().with_token(addr(REUSD), "reUSD", 18)).await;
        let outcome = service.fund(&fund_request(REUSD, "100")).await.unwrap();

        assert_eq!(rpc.token_of(addr(REUSD), addr(RECIPIENT)), U256::exp10(20));
        let balances = outcome.balances.as_ref().unwrap();
        assert_eq!(balances.tokens.get("reUSD").map(String::as_str), Some("100"));
        assert!(rpc.calls().contains(&"tenderly_setErc20Balance".to_string()));
    }

    #[tokio::test]
    async fn test_fund_succeeds_when_refresh_fails() {
        let (service, rpc) = connected(FakeRpc::default().failing_eth_balance()).await;
        let outcome = service.fund(&fund_request(ETH_ADDRESS, "2")).await.unwrap();

        assert_eq!(outcome.message, "Success");
        assert!(outcome.balances.is_none());
        assert_eq!(rpc.eth_of(addr(RECIPIENT)), U256::from(2_000_000_000_000_000_000u64));
        assert_eq!(service.form_notices.success.current().as_deref(), Some("Success"));
        assert!(service.form_notices.error.current().is_none());
        assert!(!service.form().loading);
    }

    #[tokio::test]
    async fn test_fund_keeps_one_entry_per_recipient() {
        let (service, _) = connected(FakeRpc::default()).await;
        let checksummed = ethers::utils::to_checksum(&addr(RECIPIENT), None);
        assert_ne!(checksummed, RECIPIENT);

        service.get_all_balances(&checksummed).await.unwrap();
        let request = FundRequest {
            recipient: format!(" {checksummed} "),
            ..fund_request(ETH_ADDRESS, "1")
        };
        service.fund(&request).await.unwrap();
        service.fund(&fund_request(ETH_ADDRESS, "1")).await.unwrap();

        assert_eq!(service.saved_addresses(), vec![checksummed]);
    }

    #[tokio::test]
    async fn test_fund_custom_token_reads_decimals() {
        let (service, rpc) = connected(FakeRpc::default().with_token(addr(CUSTOM), "TKN", 6)).await;
        let request = FundRequest {
            use_custom_token: true,
            custom_token: Some(CUSTOM.to_string()),
            ..fund_request(ETH_ADDRESS, "2.5")
        };
        service.fund(&request).await.unwrap();

        assert_eq!(rpc.token_of(addr(CUSTOM), addr(RECIPIENT)), U256::from(2_500_000u64));
    }

    #[tokio::test]
    async fn test_fund_rejects_non_erc20_custom_token() {
        let (service, rpc) = connected(FakeRpc::default()).await;
        let request = FundRequest {
            use_custom_token: true,
            custom_token: Some(CUSTOM.to_string()),
            ..fund_request(ETH_ADDRESS, "1")
        };
        let err = service.fund(&request).await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid custom token");
        assert_eq!(service.form_notices.error.current().as_deref(), Some("Invalid custom token"));
        assert!(!rpc.calls().contains(&"tenderly_setErc20Balance".to_string()));
    }

    #[tokio::test]
    async fn test_fund_validation_errors_are_shown() {
        let (service, _) = connected(FakeRpc::default()).await;
        let mut request = fund_request(ETH_ADDRESS, "1");
        request.recipient = "nope".to_string();

        let err = service.fund(&request).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid address");
        assert_eq!(service.form_notices.error.current().as_deref(), Some("Invalid address"));

        // Changing an input clears the stale error
        service.dispatch(vec![FormAction::SetRecipient(RECIPIENT.to_string())]);
        assert_eq!(service.form_notices.error.current(), None);
    }

    #[tokio::test]
    async fn test_admin_rpc_failure_is_reported() {
        let (service, _) = connected(FakeRpc::default().failing_admin()).await;
        let err = service.fund(&fund_request(ETH_ADDRESS, "1")).await.unwrap_err();
        assert!(err.user_message().contains("tenderly_setBalance"));
    }

    #[tokio::test]
    async fn test_all_balances_falls_back_to_sequential_reads() {
        let rpc = FakeRpc::default()
            .with_token(addr(REUSD), "reUSD", 18)
            .failing_multicall();
        let (service, rpc) = connected(rpc).await;

        let snapshot = service.get_all_balances(RECIPIENT).await.unwrap();
        assert_eq!(snapshot.eth, "0");
        // Only the readable token is reported
        assert_eq!(snapshot.tokens.len(), 1);
        assert_eq!(snapshot.tokens.get("reUSD").map(String::as_str), Some("0"));
        assert!(rpc.calls().contains(&"balanceOf".to_string()));
    }

    #[tokio::test]
    async fn test_all_balances_saves_address() {
        let (service, _) = connected(FakeRpc::default()).await;
        service.get_all_balances(RECIPIENT).await.unwrap();
        service.get_all_balances(RECIPIENT).await.unwrap();
        assert_eq!(service.saved_addresses(), vec![RECIPIENT.to_string()]);

        assert!(service.get_all_balances("0x12").await.is_err());
        assert_eq!(service.saved_addresses().len(), 1);
    }

    #[tokio::test]
    async fn test_address_balances_for_one_token() {
        let (service, _) = connected(FakeRpc::default().with_token(addr(CUSTOM), "TKN", 6)).await;
        service.set_token_balance(CUSTOM, RECIPIENT, "12.5", 6).await.unwrap();

        let balances = service.get_address_balances(RECIPIENT, Some(CUSTOM)).await.unwrap();
        assert_eq!(balances.token.as_deref(), Some("12.5"));
        assert_eq!(balances.symbol.as_deref(), Some("TKN"));

        let eth_only = service.get_address_balances(RECIPIENT, None).await.unwrap();
        assert_eq!(eth_only.token, None);
    }

    #[tokio::test]
    async fn test_token_validation() {
        let rpc = FakeRpc::default().with_token(addr(CUSTOM), "TKN", 6);
        let (service, _) = connected(rpc).await;

        let token = service.validate_token(CUSTOM).await.unwrap();
        assert_eq!(token.symbol, "TKN");
        assert_eq!(token.decimals, 6);
        assert!(!service.is_valid_erc20(ETH_ADDRESS).await);
        assert!(!service.is_valid_erc20(REUSD).await);
    }

    #[tokio::test]
    async fn test_token_validation_times_out() {
        let rpc = FakeRpc::default()
            .with_token(addr(CUSTOM), "TKN", 6)
            .slow_metadata(Duration::from_secs(2));
        let (service, _) = connected(rpc).await;

        let err = service.validate_token(CUSTOM).await.unwrap_err();
        assert_eq!(err.user_message(), "Token validation timed out");
    }

    #[tokio::test]
    async fn test_advance_timestamp() {
        let (service, rpc) = connected(FakeRpc::default().with_timestamp(1_000)).await;

        let outcome = service.advance_timestamp(2, TimeUnit::Days).await.unwrap();
        assert_eq!(outcome.advanced_seconds, 172_800);
        assert_eq!(outcome.timestamp, 1_000 + 172_800 + 1);
        assert_eq!(service.timestamp_form().time_unit, TimeUnit::Days);
        assert!(service.timestamp_notices.success.current().is_some());

        let calls = rpc.calls();
        let increase = calls.iter().position(|c| c == "evm_increaseTime").unwrap();
        let mine = calls.iter().rposition(|c| c == "evm_mine").unwrap();
        assert!(increase < mine);
    }

    #[tokio::test]
    async fn test_advance_rejects_zero() {
        let (service, rpc) = connected(FakeRpc::default().with_timestamp(1_000)).await;
        let err = service.advance_timestamp(0, TimeUnit::Days).await.unwrap_err();

        assert_eq!(err.user_message(), "Amount must be greater than zero");
        assert!(!rpc.calls().contains(&"evm_increaseTime".to_string()));
        assert_eq!(
            service.timestamp_notices.error.current().as_deref(),
            Some("Amount must be greater than zero")
        );
    }

    #[tokio::test]
    async fn test_advance_failure_message() {
        let (service, _) = connected(FakeRpc::default().failing_admin()).await;
        let err = service.advance_timestamp(1, TimeUnit::Seconds).await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to advance timestamp");
        assert_eq!(
            service.timestamp_notices.error.current().as_deref(),
            Some("Failed to advance timestamp")
        );
        assert!(!service.timestamp_form().loading);
    }

    #[tokio::test]
    async fn test_current_timestamp_mines_first() {
        let (service, _) = connected(FakeRpc::default().with_timestamp(50)).await;
        assert_eq!(service.current_timestamp().await, Some(51));

        let (failing, _) = connected(FakeRpc::default().failing_admin()).await;
        assert_eq!(failing.current_timestamp().await, None);
    }

    #[tokio::test]
    async fn test_not_connected() {
        let service = faucet_service(Arc::new(FakeRpc::default()), false).await;

        let err = service.get_all_balances(RECIPIENT).await.unwrap_err();
        assert_eq!(err.user_message(), "Provider is not initialized");
        assert_eq!(service.current_timestamp().await, None);
    }
}
