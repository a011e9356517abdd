//! Wallet capabilities: the only point of contact with user custody.
//!
//! The SDK never holds keys. A [`WalletConnector`] wraps whatever wallet
//! discovery mechanism the host application has (a browser extension bridge,
//! a remote signer, a test double) and hands back an [`Account`] bound to an
//! RPC endpoint. Every state-changing call goes through [`Account::execute`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::contracts::Call;
use crate::error::WalletError;
use crate::shared::{ContractAddress, TransactionHash};

/// How the wallet picker behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalMode {
    /// Always show the picker, even if a wallet was used before.
    #[default]
    AlwaysAsk,
    /// Reuse the last wallet without prompting when possible.
    CanAsk,
    /// Never prompt; only succeed if a wallet is already authorized.
    NeverAsk,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalTheme {
    #[default]
    Dark,
    Light,
    System,
}

/// Options passed to the wallet picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    pub modal_mode: ModalMode,
    pub modal_theme: ModalTheme,
}

/// A wallet bound to an RPC endpoint, able to submit transactions.
#[async_trait]
pub trait Account: Send + Sync {
    /// The account contract address.
    fn address(&self) -> ContractAddress;

    /// Sign and submit `calls` as one multicall transaction.
    ///
    /// Resolves once the wallet has handed the transaction to the network.
    async fn execute(&self, calls: Vec<Call>) -> Result<TransactionHash, WalletError>;
}

/// The external wallet-discovery SDK.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Opaque handle to the wallet the user picked.
    type Handle: Send;

    /// Run the selection flow. `Ok(None)` means the user dismissed it.
    async fn select_wallet(
        &self,
        options: &SelectOptions,
    ) -> Result<Option<Self::Handle>, WalletError>;

    /// Bind the selected wallet to a node endpoint.
    async fn bind_provider(
        &self,
        handle: Self::Handle,
        rpc_url: &str,
    ) -> Result<Arc<dyn Account>, WalletError>;
}
