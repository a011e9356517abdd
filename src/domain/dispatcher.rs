//! Vault action dispatcher: approve, deposit, withdraw.
//!
//! Every action runs the same four steps: require a session, parse and
//! bounds-check the amount, submit through the bound wallet, then refresh the
//! snapshot if the action moved a balance the snapshot reads.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::config::VaultConfig;
use crate::contracts::{BtcVault, Call, Erc20};
use crate::domain::reader::VaultReader;
use crate::domain::state::SharedState;
use crate::error::{VaultError, WalletError};
use crate::shared::{format_units, parse_units, AmountError, TransactionHash};
use crate::wallet::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Approve,
    Deposit,
    Withdraw,
}

impl ActionKind {
    fn failed(self, e: WalletError) -> VaultError {
        match self {
            ActionKind::Approve => VaultError::Approval(e),
            ActionKind::Deposit => VaultError::Deposit(e),
            ActionKind::Withdraw => VaultError::Withdraw(e),
        }
    }

    /// Allowance is not part of the snapshot, so approve skips the refresh.
    pub fn refreshes_snapshot(self) -> bool {
        !matches!(self, ActionKind::Approve)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Approve => write!(f, "approve"),
            ActionKind::Deposit => write!(f, "deposit"),
            ActionKind::Withdraw => write!(f, "withdraw"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionState {
    #[default]
    Idle,
    Submitting,
    Confirmed,
    Failed,
}

/// The most recent user-initiated action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub kind: ActionKind,
    /// Base units.
    pub amount: U256,
    pub state: ActionState,
}

#[derive(Clone)]
pub struct VaultDispatcher {
    token: Erc20,
    vault: BtcVault,
    decimals: u8,
    reader: VaultReader,
}

impl VaultDispatcher {
    pub fn new(config: &VaultConfig, reader: VaultReader) -> Self {
        Self {
            token: Erc20::new(config.token_address),
            vault: BtcVault::new(config.vault_address, config.entrypoints.clone()),
            decimals: config.token_decimals,
            reader,
        }
    }

    /// Let the vault pull `amount` of the deposit asset.
    pub async fn approve(
        &self,
        state: &SharedState,
        amount: &str,
    ) -> Result<TransactionHash, VaultError> {
        self.dispatch(state, ActionKind::Approve, amount).await
    }

    pub async fn deposit(
        &self,
        state: &SharedState,
        amount: &str,
    ) -> Result<TransactionHash, VaultError> {
        self.dispatch(state, ActionKind::Deposit, amount).await
    }

    pub async fn withdraw(
        &self,
        state: &SharedState,
        amount: &str,
    ) -> Result<TransactionHash, VaultError> {
        self.dispatch(state, ActionKind::Withdraw, amount).await
    }

    /// Check `amount` for `kind` against the current session and snapshot
    /// without submitting anything. Returns the amount in base units.
    pub async fn validate(
        &self,
        state: &SharedState,
        kind: ActionKind,
        amount: &str,
    ) -> Result<U256, VaultError> {
        self.prepare(state, kind, amount).await.map(|(_, amount)| amount)
    }

    async fn prepare(
        &self,
        state: &SharedState,
        kind: ActionKind,
        amount: &str,
    ) -> Result<(Arc<dyn Account>, U256), VaultError> {
        let s = state.read().await;
        let session = s.session.as_ref().ok_or(VaultError::NotConnected)?;
        let amount = parse_units(amount, self.decimals)?;

        let available = match kind {
            ActionKind::Approve => None,
            ActionKind::Deposit => Some(s.snapshot.token_balance),
            ActionKind::Withdraw => Some(s.snapshot.vault_balance),
        };
        if let Some(available) = available {
            if amount > available {
                return Err(AmountError::ExceedsBalance {
                    requested: amount,
                    available,
                }
                .into());
            }
        }

        Ok((session.account().clone(), amount))
    }

    fn call_for(&self, kind: ActionKind, amount: U256) -> Call {
        match kind {
            ActionKind::Approve => self.token.approve(&self.vault.address(), amount),
            ActionKind::Deposit => self.vault.deposit(amount),
            ActionKind::Withdraw => self.vault.withdraw(amount),
        }
    }

    async fn dispatch(
        &self,
        state: &SharedState,
        kind: ActionKind,
        amount: &str,
    ) -> Result<TransactionHash, VaultError> {
        let (account, amount) = match self.prepare(state, kind, amount).await {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::debug!(%kind, "Rejected before submission: {}", e);
                state.write().await.record_error(&e);
                return Err(e);
            }
        };

        {
            let mut s = state.write().await;
            s.last_error = None;
            s.begin_loading();
            s.pending = Some(PendingAction {
                kind,
                amount,
                state: ActionState::Submitting,
            });
        }
        tracing::info!(
            %kind,
            amount = %format_units(amount, self.decimals),
            "Submitting vault action"
        );

        let result = account.execute(vec![self.call_for(kind, amount)]).await;

        let tx_hash = {
            let mut s = state.write().await;
            s.end_loading();
            let outcome = match &result {
                Ok(_) => ActionState::Confirmed,
                Err(_) => ActionState::Failed,
            };
            if let Some(pending) = s.pending.as_mut() {
                pending.state = outcome;
            }
            match result {
                Ok(tx_hash) => tx_hash,
                Err(e) => {
                    let err = kind.failed(e);
                    tracing::warn!(%kind, "{}", err);
                    s.record_error(&err);
                    return Err(err);
                }
            }
        };
        tracing::info!(%kind, %tx_hash, "Vault action submitted");

        if kind.refreshes_snapshot() {
            if let Err(e) = self.reader.refresh(state).await {
                tracing::warn!(%kind, %tx_hash, "Post-action refresh failed: {}", e);
            }
        }

        Ok(tx_hash)
    }
}
