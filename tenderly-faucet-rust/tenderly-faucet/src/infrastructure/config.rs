use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tenderly_faucet_core::shared::constants::{
    CACHE_STALE_THRESHOLD_MS, DEFAULT_RPC_BASE_URL, MESSAGE_DURATION_MS, MULTICALL_ADDRESS, RPC_VALIDATION_TIMEOUT_MS,
    TOKEN_VALIDATION_TIMEOUT_MS,
};
use tenderly_faucet_core::{preset_tokens, TokenDescriptor};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_dir: String,
    pub data_dir: String,
    pub rpc_base_url: String,
    pub rpc_validation_timeout_ms: u64,
    pub token_validation_timeout_ms: u64,
    pub message_duration_ms: u64,
    pub cache_stale_hours: u64,
    pub multicall_address: String,
    pub tokens: Vec<TokenDescriptor>,
    pub config_file_path: Option<String>,
    pub last_modified: Option<u64>,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            data_dir: "data".to_string(),
            rpc_base_url: DEFAULT_RPC_BASE_URL.to_string(),
            rpc_validation_timeout_ms: RPC_VALIDATION_TIMEOUT_MS,
            token_validation_timeout_ms: TOKEN_VALIDATION_TIMEOUT_MS,
            message_duration_ms: MESSAGE_DURATION_MS,
            cache_stale_hours: (CACHE_STALE_THRESHOLD_MS / (60 * 60 * 1000)) as u64,
            multicall_address: MULTICALL_ADDRESS.to_string(),
            tokens: preset_tokens(),
            config_file_path: None,
            last_modified: Some(Utc::now().timestamp() as u64),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();

        let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "faucet.json".to_string());

        // A config file wins over the environment
        let config = match Self::load_from_file(Path::new(&config_file))? {
            Some(config) => config,
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Config from a JSON file; `None` when the file does not exist.
    ///
    /// Missing fields take their defaults. A file that cannot be read or
    /// parsed is an error.
    pub fn load_from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to deserialize config {}: {}", path.display(), e))?;
        config.config_file_path = Some(path.display().to_string());
        config.last_modified = Some(Utc::now().timestamp() as u64);
        Ok(Some(config))
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: Self::validate_and_get_env_var("HOST", &defaults.host, false)?,
            port: Self::parse_env_var("PORT", defaults.port)?,
            log_level: Self::validate_and_get_env_var("LOG_LEVEL", &defaults.log_level, false)?,
            log_dir: Self::validate_and_get_env_var("LOG_DIR", &defaults.log_dir, false)?,
            data_dir: Self::validate_and_get_env_var("DATA_DIR", &defaults.data_dir, false)?,
            rpc_base_url: Self::validate_and_get_env_var("TENDERLY_RPC_BASE_URL", &defaults.rpc_base_url, false)?,
            rpc_validation_timeout_ms: Self::parse_env_var(
                "RPC_VALIDATION_TIMEOUT_MS",
                defaults.rpc_validation_timeout_ms,
            )?,
            token_validation_timeout_ms: Self::parse_env_var(
                "TOKEN_VALIDATION_TIMEOUT_MS",
                defaults.token_validation_timeout_ms,
            )?,
            message_duration_ms: Self::parse_env_var("MESSAGE_DURATION_MS", defaults.message_duration_ms)?,
            cache_stale_hours: Self::parse_env_var("CACHE_STALE_HOURS", defaults.cache_stale_hours)?,
            multicall_address: Self::validate_and_get_env_var(
                "MULTICALL_ADDRESS",
                &defaults.multicall_address,
                false,
            )?,
            ..defaults
        })
    }

    /// Problems with this configuration, empty when it is usable
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("PORT must be greater than 0".to_string());
        }
        if !self.rpc_base_url.starts_with("http://") && !self.rpc_base_url.starts_with("https://") {
            errors.push(format!("Invalid TENDERLY_RPC_BASE_URL: '{}'", self.rpc_base_url));
        }
        if self.rpc_validation_timeout_ms == 0 {
            errors.push("RPC_VALIDATION_TIMEOUT_MS must be greater than 0".to_string());
        }
        if self.token_validation_timeout_ms == 0 {
            errors.push("TOKEN_VALIDATION_TIMEOUT_MS must be greater than 0".to_string());
        }
        if !Self::is_valid_hex_address(&self.multicall_address) {
            errors.push(format!(
                "Invalid MULTICALL_ADDRESS format: '{}'. Expected: 0x followed by 40 hex characters",
                self.multicall_address
            ));
        }
        if self.tokens.is_empty() {
            errors.push("At least one token must be configured".to_string());
        }
        for token in &self.tokens {
            if !Self::is_valid_hex_address(&token.address) {
                errors.push(format!("Invalid address for token {}: '{}'", token.symbol, token.address));
            }
        }

        errors
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
        }
    }

    pub fn rpc_validation_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_validation_timeout_ms)
    }

    pub fn token_validation_timeout(&self) -> Duration {
        Duration::from_millis(self.token_validation_timeout_ms)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_duration_ms)
    }

    pub fn cache_stale_threshold_ms(&self) -> i64 {
        (self.cache_stale_hours as i64).saturating_mul(60 * 60 * 1000)
    }

    /// Validates if a string is a valid hex address (0x followed by 40 hex characters)
    pub fn is_valid_hex_address(address: &str) -> bool {
        let Some(hex_part) = address.strip_prefix("0x") else {
            return false;
        };
        hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Validates environment variables and provides fallback values
    pub fn validate_and_get_env_var(key: &str, fallback: &str, required: bool) -> Result<String> {
        match env::var(key) {
            Ok(value) => {
                if value.is_empty() {
                    if required {
                        return Err(anyhow!("Environment variable {} is required but empty", key));
                    }
                    Ok(fallback.to_string())
                } else {
                    Ok(value)
                }
            }
            Err(_) => {
                if required {
                    return Err(anyhow!("Required environment variable {} is not set", key));
                }
                Ok(fallback.to_string())
            }
        }
    }

    fn parse_env_var<T>(key: &str, fallback: T) -> Result<T>
    where
        T: FromStr + ToString,
        T::Err: std::fmt::Display,
    {
        let raw = Self::validate_and_get_env_var(key, &fallback.to_string(), false)?;
        T::from_str(raw.trim()).map_err(|e| anyhow!("Invalid value for {}: '{}' ({})", key, raw, e))
    }
}

/// Shared, read-only view of the loaded configuration
pub struct ConfigManager {
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(Config::new()?))
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub async fn get_config(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn validate_config(&self) -> Vec<String> {
        self.config.read().await.validation_errors()
    }

    pub async fn get_config_summary(&self) -> serde_json::Value {
        let config = self.config.read().await;

        serde_json::json!({
            "version": config.version,
            "host": config.host,
            "port": config.port,
            "log_level": config.log_level,
            "rpc_base_url": config.rpc_base_url,
            "rpc_validation_timeout_ms": config.rpc_validation_timeout_ms,
            "token_validation_timeout_ms": config.token_validation_timeout_ms,
            "message_duration_ms": config.message_duration_ms,
            "tokens_count": config.tokens.len(),
            "data_dir": config.data_dir,
            "config_file_path": config.config_file_path,
            "last_modified": config.last_modified,
        })
    }
}
