//! `VaultSnapshot`: token and vault state as of the last successful refresh.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contracts::VaultPosition;

/// All amounts are base units of their token.
///
/// Replaced wholesale by each refresh; `VaultSnapshot::default()` is the zero
/// value shown while no session is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    /// Deposit asset held by the connected address.
    pub token_balance: U256,
    /// Vault receipt tokens held by the connected address.
    pub share_balance: U256,
    /// Balance the vault has recorded for the connected address.
    pub vault_balance: U256,
    pub total_deposited: U256,
    pub asset_price: U256,
    pub paused: bool,
    pub deposit_fee_rate: U256,
    pub position: VaultPosition,
    /// When the reads completed. `None` in the zero value.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl VaultSnapshot {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
