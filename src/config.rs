//! Client configuration: contract addresses, RPC endpoint, polling cadence.
//!
//! Defaults point at the Sepolia deployment in [`crate::network`]. Every value
//! can be overridden through [`VaultConfigBuilder`] or the environment.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::contracts::VaultEntrypoints;
use crate::error::SdkError;
use crate::network;
use crate::rpc::RetryPolicy;
use crate::shared::ContractAddress;
use crate::wallet::SelectOptions;

pub const ENV_RPC_URL: &str = "BTC_VAULT_RPC_URL";
pub const ENV_TOKEN_ADDRESS: &str = "BTC_VAULT_TOKEN_ADDRESS";
pub const ENV_SHARE_TOKEN_ADDRESS: &str = "BTC_VAULT_SHARE_TOKEN_ADDRESS";
pub const ENV_VAULT_ADDRESS: &str = "BTC_VAULT_ADDRESS";
pub const ENV_REFRESH_SECS: &str = "BTC_VAULT_REFRESH_SECS";

/// Where the snapshot's asset price comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Read the vault's oracle-backed `get_asset_price`.
    #[default]
    Vault,
    /// Use a constant instead of reading it.
    Fixed(U256),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    pub rpc_url: String,
    /// Deposit asset (WBTC).
    pub token_address: ContractAddress,
    /// Vault receipt token (rbBTC).
    pub share_token_address: ContractAddress,
    pub vault_address: ContractAddress,
    pub token_decimals: u8,
    pub refresh_interval: Duration,
    pub entrypoints: VaultEntrypoints,
    pub price_source: PriceSource,
    pub read_retry: RetryPolicy,
    pub wallet: SelectOptions,
}

impl VaultConfig {
    pub fn builder() -> VaultConfigBuilder {
        VaultConfigBuilder::default()
    }

    /// Sepolia defaults.
    pub fn sepolia() -> Result<Self, SdkError> {
        VaultConfigBuilder::default().build()
    }

    /// Sepolia defaults with any `BTC_VAULT_*` environment overrides applied.
    pub fn from_env() -> Result<Self, SdkError> {
        VaultConfigBuilder::from_env().build()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct VaultConfigBuilder {
    rpc_url: String,
    token_address: String,
    share_token_address: String,
    vault_address: String,
    token_decimals: u8,
    refresh_interval: Duration,
    entrypoints: VaultEntrypoints,
    price_source: PriceSource,
    read_retry: RetryPolicy,
    wallet: SelectOptions,
}

impl Default for VaultConfigBuilder {
    fn default() -> Self {
        Self {
            rpc_url: network::DEFAULT_RPC_URL.to_string(),
            token_address: network::WBTC_ADDRESS.to_string(),
            share_token_address: network::RB_BTC_ADDRESS.to_string(),
            vault_address: network::BTC_VAULT_ADDRESS.to_string(),
            token_decimals: network::WBTC_DECIMALS,
            refresh_interval: network::DEFAULT_REFRESH_INTERVAL,
            entrypoints: VaultEntrypoints::default(),
            price_source: PriceSource::default(),
            read_retry: RetryPolicy::None,
            wallet: SelectOptions::default(),
        }
    }
}

impl VaultConfigBuilder {
    /// Start from the defaults, then apply any `BTC_VAULT_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.rpc_url = url;
        }
        if let Some(addr) = lookup(ENV_TOKEN_ADDRESS) {
            self.token_address = addr;
        }
        if let Some(addr) = lookup(ENV_SHARE_TOKEN_ADDRESS) {
            self.share_token_address = addr;
        }
        if let Some(addr) = lookup(ENV_VAULT_ADDRESS) {
            self.vault_address = addr;
        }
        match lookup(ENV_REFRESH_SECS).map(|s| s.parse::<u64>()) {
            Some(Ok(secs)) => self.refresh_interval = Duration::from_secs(secs),
            Some(Err(e)) => tracing::warn!("Ignoring {}: {}", ENV_REFRESH_SECS, e),
            None => {}
        }
        self
    }

    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = url.to_string();
        self
    }

    pub fn token_address(mut self, address: &str) -> Self {
        self.token_address = address.to_string();
        self
    }

    pub fn share_token_address(mut self, address: &str) -> Self {
        self.share_token_address = address.to_string();
        self
    }

    pub fn vault_address(mut self, address: &str) -> Self {
        self.vault_address = address.to_string();
        self
    }

    pub fn token_decimals(mut self, decimals: u8) -> Self {
        self.token_decimals = decimals;
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn entrypoints(mut self, entrypoints: VaultEntrypoints) -> Self {
        self.entrypoints = entrypoints;
        self
    }

    pub fn price_source(mut self, source: PriceSource) -> Self {
        self.price_source = source;
        self
    }

    /// Retry policy for snapshot reads. Writes are never retried.
    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    pub fn wallet_options(mut self, options: SelectOptions) -> Self {
        self.wallet = options;
        self
    }

    pub fn build(self) -> Result<VaultConfig, SdkError> {
        if self.rpc_url.trim().is_empty() {
            return Err(SdkError::Config("RPC URL is empty".to_string()));
        }
        if self.refresh_interval.is_zero() {
            return Err(SdkError::Config("refresh interval must be non-zero".to_string()));
        }

        Ok(VaultConfig {
            rpc_url: self.rpc_url,
            token_address: ContractAddress::from_str(&self.token_address)?,
            share_token_address: ContractAddress::from_str(&self.share_token_address)?,
            vault_address: ContractAddress::from_str(&self.vault_address)?,
            token_decimals: self.token_decimals,
            refresh_interval: self.refresh_interval,
            entrypoints: self.entrypoints,
            price_source: self.price_source,
            read_retry: self.read_retry,
            wallet: self.wallet,
        })
    }
}
