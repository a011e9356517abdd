//! High-level client: `VaultClient` wiring session, reader, dispatcher and poller
//! around one shared `AppState`.

use std::sync::Arc;

use alloy_primitives::U256;
use async_lock::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::VaultConfig;
use crate::domain::{
    ActionKind, AppState, SessionManager, SharedState, VaultDispatcher, VaultReader,
    VaultSnapshot,
};
use crate::error::{SdkError, VaultError};
use crate::poller::RefreshPoller;
use crate::rpc::Provider;
use crate::shared::{ContractAddress, TransactionHash};
use crate::wallet::WalletConnector;

/// Both halves of [`VaultClient::approve_and_deposit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub approval: TransactionHash,
    pub deposit: TransactionHash,
}

/// The primary entry point.
///
/// Owns the application state and hands it by reference to the session
/// manager, reader and dispatcher. The background refresh runs only while a
/// session is active.
pub struct VaultClient<C: WalletConnector> {
    config: VaultConfig,
    state: SharedState,
    sessions: SessionManager<C>,
    reader: VaultReader,
    dispatcher: VaultDispatcher,
    poller: Mutex<Option<RefreshPoller>>,
}

impl<C: WalletConnector> VaultClient<C> {
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Handle to the shared state, for rendering.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub async fn snapshot(&self) -> VaultSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn address(&self) -> Option<ContractAddress> {
        self.state.read().await.address()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.is_connected()
    }

    // ── Session ──────────────────────────────────────────────────────────

    /// Connect a wallet, load the first snapshot and start polling.
    ///
    /// A failed first refresh is logged and left in `last_error`; the
    /// connection itself still succeeds.
    pub async fn connect(&self) -> Result<ContractAddress, VaultError> {
        let address = self.sessions.connect(&self.state).await?;

        if let Err(e) = self.reader.refresh(&self.state).await {
            tracing::warn!(%address, "Initial refresh failed: {}", e);
        }

        let mut poller = self.poller.lock().await;
        if let Some(previous) = poller.take() {
            previous.stop().await;
        }
        *poller = Some(RefreshPoller::start(
            self.reader.clone(),
            self.state.clone(),
            self.config.refresh_interval,
        ));

        Ok(address)
    }

    /// Stop polling, then clear the session and snapshot.
    pub async fn disconnect(&self) {
        if let Some(poller) = self.poller.lock().await.take() {
            poller.stop().await;
        }
        self.sessions.disconnect(&self.state).await;
    }

    pub async fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(RefreshPoller::is_running)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn refresh(&self) -> Result<(), VaultError> {
        self.reader.refresh(&self.state).await
    }

    // ── Actions ──────────────────────────────────────────────────────────

    pub async fn approve(&self, amount: &str) -> Result<TransactionHash, VaultError> {
        self.dispatcher.approve(&self.state, amount).await
    }

    pub async fn deposit(&self, amount: &str) -> Result<TransactionHash, VaultError> {
        self.dispatcher.deposit(&self.state, amount).await
    }

    pub async fn withdraw(&self, amount: &str) -> Result<TransactionHash, VaultError> {
        self.dispatcher.withdraw(&self.state, amount).await
    }

    /// Approve exactly `amount`, then deposit it.
    ///
    /// The deposit is validated before anything is submitted. If the approval
    /// lands and the deposit then fails, the allowance stays granted and only
    /// the deposit error is returned.
    pub async fn approve_and_deposit(&self, amount: &str) -> Result<DepositReceipt, VaultError> {
        let base_units: U256 = self
            .dispatcher
            .validate(&self.state, ActionKind::Deposit, amount)
            .await?;
        tracing::debug!(%base_units, "Approve-then-deposit");

        let approval = self.dispatcher.approve(&self.state, amount).await?;
        let deposit = self.dispatcher.deposit(&self.state, amount).await?;
        Ok(DepositReceipt { approval, deposit })
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct VaultClientBuilder {
    config: Option<VaultConfig>,
    provider: Option<Arc<dyn Provider>>,
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to [`VaultConfig::from_env`].
    pub fn config(mut self, config: VaultConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Node used for snapshot reads. Defaults to a [`StarknetRpc`](crate::rpc::StarknetRpc)
    /// at the configured URL.
    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build<C: WalletConnector>(self, connector: C) -> Result<VaultClient<C>, SdkError> {
        let config = match self.config {
            Some(config) => config,
            None => VaultConfig::from_env()?,
        };
        let provider = match self.provider {
            Some(provider) => provider,
            None => default_provider(&config)?,
        };

        let reader = VaultReader::new(provider, &config);
        let dispatcher = VaultDispatcher::new(&config, reader.clone());
        let sessions = SessionManager::new(connector, &config.rpc_url, config.wallet);

        Ok(VaultClient {
            config,
            state: AppState::shared(),
            sessions,
            reader,
            dispatcher,
            poller: Mutex::new(None),
        })
    }
}

#[cfg(feature = "http")]
fn default_provider(config: &VaultConfig) -> Result<Arc<dyn Provider>, SdkError> {
    let rpc = crate::rpc::StarknetRpc::new(&config.rpc_url)?.with_retry(config.read_retry.clone());
    Ok(Arc::new(rpc))
}

#[cfg(not(feature = "http"))]
fn default_provider(_config: &VaultConfig) -> Result<Arc<dyn Provider>, SdkError> {
    Err(SdkError::Config(
        "no provider given and the `http` feature is disabled".to_string(),
    ))
}
