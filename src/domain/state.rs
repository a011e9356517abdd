//! `AppState`: the one place session, snapshot and UI flags live.
//!
//! Shared between the components and the poller as `Arc<RwLock<AppState>>`.
//! Writers take the lock only to swap values in; no lock is held while a
//! wallet or RPC call is outstanding.

use std::sync::Arc;

use async_lock::RwLock;

use crate::domain::dispatcher::{ActionState, PendingAction};
use crate::domain::session::Session;
use crate::domain::snapshot::VaultSnapshot;
use crate::error::VaultError;
use crate::shared::ContractAddress;

pub type SharedState = Arc<RwLock<AppState>>;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Option<Session>,
    /// True while the wallet picker is open.
    pub connecting: bool,
    pub snapshot: VaultSnapshot,
    /// The most recent user-initiated action, if any.
    pub pending: Option<PendingAction>,
    /// Refreshes and actions currently in flight.
    pub(crate) in_flight: usize,
    /// Human-readable message of the last failure; cleared when a new operation starts.
    pub last_error: Option<String>,
    pub(crate) last_session_id: u64,
}

impl AppState {
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn address(&self) -> Option<ContractAddress> {
        self.session.as_ref().map(Session::address)
    }

    /// True while any refresh or action is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub(crate) fn begin_loading(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn end_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn action_state(&self) -> ActionState {
        self.pending
            .as_ref()
            .map(|p| p.state)
            .unwrap_or_default()
    }

    pub(crate) fn record_error(&mut self, err: &VaultError) {
        self.last_error = Some(err.to_string());
    }
}
