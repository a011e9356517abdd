//! Periodic snapshot refresh, bound to a session's lifetime.
//!
//! Started after a successful connect, stopped on disconnect. A failed tick is
//! logged and the loop keeps going; the next tick retries.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::{SharedState, VaultReader};

/// How long [`RefreshPoller::stop`] waits for an in-flight tick to wind down.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RefreshPoller {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshPoller {
    /// Spawn the loop. The first tick fires one `period` from now.
    pub fn start(reader: VaultReader, state: SharedState, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_poller(reader, state, period, shutdown_rx));
        tracing::debug!(?period, "Refresh poller started");
        Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop and wait for it to exit. Aborts it if it takes too long.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(mut handle) = self.handle.take() {
            if tokio::time::timeout(STOP_TIMEOUT, &mut handle).await.is_err() {
                tracing::warn!("Refresh poller did not stop in time, aborting");
                handle.abort();
            }
        }
        tracing::debug!("Refresh poller stopped");
    }
}

impl Drop for RefreshPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_poller(
    reader: VaultReader,
    state: SharedState,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset(); // skip immediate first tick

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if !state.read().await.is_connected() {
                    break;
                }
                if let Err(e) = reader.refresh(&state).await {
                    tracing::warn!("Scheduled refresh failed: {}", e);
                }
            }
        }
    }
}
