//! Constants for the faucet
//!
//! Storage keys, well-known addresses, timeouts and time conversions.

// Storage keys
pub const STORAGE_KEY_SAVED_ADDRESSES: &str = "tenderly-faucet-addresses";
pub const STORAGE_KEY_RPC_CACHE: &str = "tenderly-faucet-rpc-cache";
pub const ERROR_COOKIE_NAME: &str = "tenderly-faucet-error";

// Multicall3, deployed at the same address on most networks
pub const MULTICALL_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

// The zero address stands for native ETH in the token list
pub const ETH_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const ETH_DECIMALS: u8 = 18;

// Time conversions (seconds)
pub const SECONDS_PER_SECOND: u64 = 1;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_WEEK: u64 = 604_800;

// Timeouts (milliseconds)
pub const RPC_VALIDATION_TIMEOUT_MS: u64 = 10_000;
pub const TOKEN_VALIDATION_TIMEOUT_MS: u64 = 5_000;

// Transient UI messages (milliseconds)
pub const MESSAGE_DURATION_MS: u64 = 2_000;

// RPC cache entries older than this are reported as stale
pub const CACHE_STALE_THRESHOLD_MS: i64 = 24 * 60 * 60 * 1000;

// Tenderly endpoints
pub const DEFAULT_RPC_BASE_URL: &str = "https://virtual.mainnet.rpc.tenderly.co";
pub const DEFAULT_REGION: &str = "default";
