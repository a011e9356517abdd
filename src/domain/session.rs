//! Wallet session manager: connect and disconnect.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::snapshot::VaultSnapshot;
use crate::domain::state::SharedState;
use crate::error::{VaultError, WalletError};
use crate::shared::ContractAddress;
use crate::wallet::{Account, SelectOptions, WalletConnector};

/// An active wallet connection.
///
/// The address is read from the bound account once, at creation.
#[derive(Clone)]
pub struct Session {
    id: u64,
    account: Arc<dyn Account>,
    address: ContractAddress,
    connected_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(id: u64, account: Arc<dyn Account>) -> Self {
        let address = account.address();
        Self {
            id,
            account,
            address,
            connected_at: Utc::now(),
        }
    }

    /// Generation number; a reconnect always gets a larger one.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    pub fn account(&self) -> &Arc<dyn Account> {
        &self.account
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("connected_at", &self.connected_at)
            .finish()
    }
}

pub struct SessionManager<C> {
    connector: C,
    rpc_url: String,
    options: SelectOptions,
}

impl<C: WalletConnector> SessionManager<C> {
    pub fn new(connector: C, rpc_url: &str, options: SelectOptions) -> Self {
        Self {
            connector,
            rpc_url: rpc_url.to_string(),
            options,
        }
    }

    /// Open the wallet picker and bind the chosen wallet to the RPC endpoint.
    ///
    /// On failure the previous session (if any) is left in place and the error
    /// message is stored in `last_error`. `connecting` is reset either way.
    pub async fn connect(&self, state: &SharedState) -> Result<ContractAddress, VaultError> {
        {
            let mut s = state.write().await;
            s.connecting = true;
            s.last_error = None;
        }

        let result = self.open_wallet().await;

        let mut s = state.write().await;
        s.connecting = false;

        match result {
            Ok(account) => {
                s.last_session_id += 1;
                let session = Session::new(s.last_session_id, account);
                let address = session.address();

                if let Some(previous) = s.session.replace(session) {
                    if previous.address() != address {
                        s.snapshot = VaultSnapshot::default();
                    }
                }
                tracing::info!(%address, session_id = s.last_session_id, "Wallet connected");
                Ok(address)
            }
            Err(e) => {
                let err = VaultError::Connection(e);
                tracing::warn!("{}", err);
                s.record_error(&err);
                Err(err)
            }
        }
    }

    async fn open_wallet(&self) -> Result<Arc<dyn Account>, WalletError> {
        let handle = self
            .connector
            .select_wallet(&self.options)
            .await?
            .ok_or(WalletError::NoWalletSelected)?;
        self.connector.bind_provider(handle, &self.rpc_url).await
    }

    /// Drop the session and reset the snapshot to its zero value. No I/O.
    pub async fn disconnect(&self, state: &SharedState) {
        let mut s = state.write().await;
        if let Some(session) = s.session.take() {
            tracing::info!(address = %session.address(), "Wallet disconnected");
        }
        s.snapshot = VaultSnapshot::default();
        s.pending = None;
    }
}
