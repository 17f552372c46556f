use crate::infrastructure::blockchain::{FaucetRpc, RpcConnector};
use crate::validators::rpc_validator::RpcValidator;
use chrono::DateTime;
use serde::Serialize;
use std::sync::Arc;
use tenderly_faucet_core::domain::entities::endpoint::{
    build_url, extract_guid, extract_region, is_guid, is_tenderly_url,
};
use tenderly_faucet_core::shared::utils::current_timestamp_millis;
use tenderly_faucet_core::{FaucetError, RpcCache};
use tokio::sync::RwLock;

const GUID_FAILURE_MESSAGE: &str = "Invalid GUID or unreachable RPC URL";
const SUBMIT_FAILURE_MESSAGE: &str = "Invalid or unreachable RPC URL";

struct ActiveConnection {
    url: String,
    guid: Option<String>,
    region: String,
    validated_at: i64,
    client: Arc<dyn FaucetRpc>,
}

#[derive(Default)]
struct ConnectionState {
    connection: Option<ActiveConnection>,
    /// Page-level error, kept until the next connection change
    error: Option<String>,
    /// Error of the last connect attempt
    validation_error: Option<String>,
}

/// Snapshot of the connection for pages and the JSON API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionView {
    pub connected: bool,
    pub url: Option<String>,
    pub guid: Option<String>,
    pub region: Option<String>,
    pub last_validated: Option<String>,
    pub error: Option<String>,
    pub validation_error: Option<String>,
}

/// Where an initialization request may come from
#[derive(Debug, Clone, Default)]
pub struct InitRequest {
    pub error: Option<String>,
    pub guid: Option<String>,
}

/// Owns the single active RPC connection
pub struct ConnectionManager {
    validator: RpcValidator,
    connector: Arc<dyn RpcConnector>,
    cache: RpcCache,
    base_url: String,
    stale_threshold_ms: i64,
    state: RwLock<ConnectionState>,
}

impl ConnectionManager {
    pub fn new(
        validator: RpcValidator,
        connector: Arc<dyn RpcConnector>,
        cache: RpcCache,
        base_url: &str,
        stale_threshold_ms: i64,
    ) -> Self {
        Self {
            validator,
            connector,
            cache,
            base_url: base_url.to_string(),
            stale_threshold_ms,
            state: RwLock::new(ConnectionState::default()),
        }
    }

    /// Establish a connection by priority: an incoming error, then a GUID, then the cache.
    pub async fn initialize(&self, request: InitRequest) -> ConnectionView {
        log::info!("Starting RPC initialization");

        if let Some(error) = request.error.filter(|e| !e.trim().is_empty()) {
            self.set_error(error).await;
            return self.current().await;
        }

        if let Some(guid) = request.guid.filter(|g| !g.trim().is_empty()) {
            log::info!("Validating GUID from request: {}", guid);
            if let Err(e) = self.connect_guid(&guid).await {
                self.set_error(e.user_message().to_string()).await;
            }
            return self.current().await;
        }

        self.restore_from_cache().await;
        self.current().await
    }

    /// Validate a GUID and make its endpoint the active connection
    pub async fn connect_guid(&self, guid: &str) -> Result<ConnectionView, FaucetError> {
        let guid = guid.trim();
        let result = self.validator.validate(guid).await;

        if !result.is_valid {
            let message = result.error.unwrap_or_else(|| GUID_FAILURE_MESSAGE.to_string());
            log::error!("GUID validation failed: {}", message);
            return Err(FaucetError::connection(message));
        }

        let url = match result.corrected_url {
            Some(corrected) => {
                log::info!("Auto-corrected URL with region: {}", corrected);
                corrected
            }
            None => build_url(&self.base_url, guid),
        };
        self.activate(&url).await?;
        self.cache.save(&url);
        Ok(self.current().await)
    }

    async fn restore_from_cache(&self) {
        let Some(cached) = self.cache.load() else {
            log::info!("No cached RPC found");
            return;
        };

        if cached.is_stale_after(self.stale_threshold_ms) {
            log::info!("Cached RPC was last validated over the stale threshold ago, re-validating");
        }

        let result = self.validator.validate(&cached.url).await;
        if !result.is_valid {
            let reason = result.error.unwrap_or_else(|| "Unknown error".to_string());
            log::error!("Cached RPC validation failed: {}", reason);
            self.cache.clear();
            let mut state = self.state.write().await;
            state.connection = None;
            state.error = Some(format!("Stored RPC URL is no longer valid: {reason}"));
            return;
        }

        let url = result.corrected_url.clone().unwrap_or(cached.url);
        if let Err(e) = self.activate(&url).await {
            self.set_error(e.user_message().to_string()).await;
            return;
        }
        if result.corrected_url.is_some() {
            log::info!("Updated cache with corrected URL: {}", url);
            self.cache.save(&url);
        }
    }

    /// Connect to a URL or GUID typed by the user
    pub async fn submit(&self, input: &str) -> Result<ConnectionView, FaucetError> {
        let clean = input.trim();
        if clean.is_empty() {
            let error = FaucetError::validation("RPC URL is required");
            self.state.write().await.validation_error = Some(error.user_message().to_string());
            return Err(error);
        }

        let final_url = self.validator.resolve(clean);
        if is_guid(clean) {
            log::info!("Using GUID {}", clean);
        } else if is_tenderly_url(&final_url) {
            log::info!("Using Tenderly RPC URL {}", final_url);
        } else {
            log::info!("Using custom RPC URL {}", final_url);
        }
        let new_guid = if is_guid(clean) {
            Some(clean.to_string())
        } else {
            extract_guid(&final_url)
        };

        let already_connected = {
            let state = self.state.read().await;
            let current_guid = state.connection.as_ref().and_then(|c| c.guid.as_deref());
            matches!(
                (current_guid, new_guid.as_deref()),
                (Some(current), Some(new)) if current.eq_ignore_ascii_case(new)
            )
        };
        if already_connected {
            log::info!("Already connected to this RPC, skipping validation");
            self.state.write().await.validation_error = None;
            return Ok(self.current().await);
        }

        let result = self.validator.validate(clean).await;
        if !result.is_valid {
            let message = result.error.unwrap_or_else(|| SUBMIT_FAILURE_MESSAGE.to_string());
            self.state.write().await.validation_error = Some(message.clone());
            return Err(FaucetError::connection(message));
        }

        let url = result.corrected_url.unwrap_or(final_url);
        self.activate(&url).await?;
        self.cache.save(&url);
        Ok(self.current().await)
    }

    /// Forget the connection and the cached endpoint
    pub async fn clear_and_reconnect(&self) {
        self.cache.clear();
        *self.state.write().await = ConnectionState::default();
        log::info!("Connection cleared");
    }

    pub async fn current(&self) -> ConnectionView {
        let state = self.state.read().await;
        let mut view = ConnectionView {
            error: state.error.clone(),
            validation_error: state.validation_error.clone(),
            ..ConnectionView::default()
        };
        if let Some(connection) = &state.connection {
            view.connected = true;
            view.url = Some(connection.url.clone());
            view.guid = connection.guid.clone();
            view.region = Some(connection.region.clone());
            view.last_validated = DateTime::from_timestamp_millis(connection.validated_at).map(|t| t.to_rfc3339());
        }
        view
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.connection.is_some()
    }

    /// RPC client of the active connection
    pub async fn client(&self) -> Result<Arc<dyn FaucetRpc>, FaucetError> {
        let client = self
            .state
            .read()
            .await
            .connection
            .as_ref()
            .map(|c| Arc::clone(&c.client))
            .ok_or_else(|| FaucetError::not_connected("Provider is not initialized"))?;
        self.cache.touch();
        Ok(client)
    }

    pub async fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        log::warn!("Connection error: {}", error);
        self.state.write().await.error = Some(error);
    }

    async fn activate(&self, url: &str) -> Result<(), FaucetError> {
        let client = self.connector.connect(url).map_err(|e| {
            log::error!("Failed to initialize provider: {}", e);
            FaucetError::connection("Failed to initialize provider")
        })?;

        let mut state = self.state.write().await;
        state.connection = Some(ActiveConnection {
            url: url.to_string(),
            guid: extract_guid(url),
            region: extract_region(url),
            validated_at: current_timestamp_millis(),
            client,
        });
        state.error = None;
        state.validation_error = None;
        log::info!("Connected to {}", url);
        Ok(())
    }
}
