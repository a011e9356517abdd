//! # BTC Vault SDK
//!
//! Client for a Starknet BTC yield vault: connect a wallet, read token and
//! vault balances, and submit approve/deposit/withdraw transactions.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: felts, addresses, decimal amount conversion, errors
//! 2. **Contracts**: selectors, Cairo calldata, token and vault bindings
//! 3. **RPC**: `Provider` trait and the JSON-RPC `StarknetRpc` client
//! 4. **Wallet**: `WalletConnector` / `Account` capability traits
//! 5. **Domain**: `AppState`, session manager, data reader, action dispatcher
//! 6. **High-Level Client**: `VaultClient` with background polling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use btc_vault_sdk::prelude::*;
//!
//! let client = VaultClientBuilder::new()
//!     .config(VaultConfig::sepolia()?)
//!     .build(my_wallet_connector)?;
//!
//! client.connect().await?;
//! let receipt = client.approve_and_deposit("0.5").await?;
//! println!("{}", client.snapshot().await.vault_balance);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Felts, addresses, and decimal amount conversion.
pub mod shared;

/// Unified SDK error types.
pub mod error;

/// Deployment constants.
pub mod network;

/// Client configuration and environment overrides.
pub mod config;

// ── Layer 2: Contracts ───────────────────────────────────────────────────────

pub mod contracts;

// ── Layer 3: RPC ─────────────────────────────────────────────────────────────

/// Read-only node access.
pub mod rpc;

// ── Layer 4: Wallet ──────────────────────────────────────────────────────────

pub mod wallet;

// ── Layer 5: Domain ──────────────────────────────────────────────────────────

/// Application state and the session, reader and dispatcher components.
pub mod domain;

/// Background snapshot refresh.
pub mod poller;

// ── Layer 6: High-Level Client ───────────────────────────────────────────────

/// `VaultClient`, the primary entry point.
pub mod client;

#[cfg(test)]
pub(crate) mod mock;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Core
    pub use crate::shared::{
        format_units, parse_units, to_decimal, AmountError, ContractAddress, Felt,
        TransactionHash,
    };

    // Errors
    pub use crate::error::{RpcError, SdkError, VaultError, WalletError};

    // Config
    pub use crate::config::{PriceSource, VaultConfig, VaultConfigBuilder};

    // Contracts
    pub use crate::contracts::{
        BlockId, BtcVault, Call, Erc20, PositionScope, VaultEntrypoints, VaultPosition,
    };

    // RPC
    pub use crate::rpc::{Provider, RetryConfig, RetryPolicy};
    #[cfg(feature = "http")]
    pub use crate::rpc::StarknetRpc;

    // Wallet
    pub use crate::wallet::{Account, ModalMode, ModalTheme, SelectOptions, WalletConnector};

    // Domain
    pub use crate::domain::{
        ActionKind, ActionState, AppState, PendingAction, SharedState, VaultSnapshot,
    };

    // Client
    pub use crate::client::{DepositReceipt, VaultClient, VaultClientBuilder};
}
