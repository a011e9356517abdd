//! Unified SDK error types.

use thiserror::Error;

use crate::shared::units::AmountError;
use crate::shared::FeltError;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Invalid field element: {0}")]
    Felt(#[from] FeltError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors surfaced by the session, reader and dispatcher.
///
/// The `Display` output is the human-readable message shown to the user and
/// stored in [`AppState::last_error`](crate::domain::state::AppState).
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Failed to connect wallet: {0}")]
    Connection(#[source] WalletError),

    #[error("Failed to fetch vault data: {0}")]
    DataFetch(#[source] RpcError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Approval failed: {0}")]
    Approval(#[source] WalletError),

    #[error("Deposit failed: {0}")]
    Deposit(#[source] WalletError),

    #[error("Withdraw failed: {0}")]
    Withdraw(#[source] WalletError),
}

/// JSON-RPC layer errors.
#[derive(Error, Debug)]
pub enum RpcError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("Unexpected result from {entrypoint}: {reason}")]
    UnexpectedResult { entrypoint: String, reason: String },

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Errors reported by the external wallet.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No wallet selected")]
    NoWalletSelected,

    #[error("Wallet rejected the request: {0}")]
    Rejected(String),

    #[error("Failed to bind provider {endpoint}: {reason}")]
    BindFailed { endpoint: String, reason: String },

    #[error("Transaction submission failed: {0}")]
    ExecutionFailed(String),
}
