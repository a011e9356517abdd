//! BTC vault binding: snapshot reads plus deposit/withdraw call builders.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::contracts::calldata::{encode_u256, get_selector_from_name, ResultCursor};
use crate::contracts::constants::vault;
use crate::contracts::{BlockId, Call, FunctionCall};
use crate::error::RpcError;
use crate::rpc::Provider;
use crate::shared::{ContractAddress, Felt};

/// Collateral and debt held in the lending pool, in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPosition {
    pub collateral: U256,
    pub debt: U256,
}

/// Whose position `get_vault_position` reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionScope {
    /// Pass the connected address; the user's own position.
    #[default]
    User,
    /// No arguments; the vault's aggregate position.
    Vault,
}

/// Names of the vault's write entrypoints.
///
/// Deployed vault revisions disagree on these (`deposit` vs
/// `deposit_to_vesu`), so they are configuration rather than constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntrypoints {
    pub deposit: String,
    pub withdraw: String,
    #[serde(default)]
    pub position_scope: PositionScope,
}

impl Default for VaultEntrypoints {
    fn default() -> Self {
        Self {
            deposit: vault::DEPOSIT.to_string(),
            withdraw: vault::WITHDRAW.to_string(),
            position_scope: PositionScope::User,
        }
    }
}

impl VaultEntrypoints {
    /// The revision that forwards deposits into the Vesu lending pool.
    pub fn vesu() -> Self {
        Self {
            deposit: vault::DEPOSIT_TO_VESU.to_string(),
            withdraw: vault::WITHDRAW_FROM_VESU.to_string(),
            position_scope: PositionScope::Vault,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BtcVault {
    address: ContractAddress,
    entrypoints: VaultEntrypoints,
}

impl BtcVault {
    pub fn new(address: ContractAddress, entrypoints: VaultEntrypoints) -> Self {
        Self {
            address,
            entrypoints,
        }
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    pub fn entrypoints(&self) -> &VaultEntrypoints {
        &self.entrypoints
    }

    fn request(&self, entrypoint: &str, calldata: Vec<Felt>) -> FunctionCall {
        FunctionCall {
            contract_address: self.address,
            entry_point_selector: get_selector_from_name(entrypoint),
            calldata,
        }
    }

    async fn read_u256(
        &self,
        provider: &dyn Provider,
        entrypoint: &str,
        calldata: Vec<Felt>,
        block: BlockId,
    ) -> Result<U256, RpcError> {
        let result = provider.call(&self.request(entrypoint, calldata), block).await?;
        let mut cursor = ResultCursor::new(entrypoint, &result);
        let value = cursor.next_u256()?;
        cursor.finish()?;
        Ok(value)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Balance the vault has recorded for `user`.
    pub async fn user_balance(
        &self,
        provider: &dyn Provider,
        user: &ContractAddress,
        block: BlockId,
    ) -> Result<U256, RpcError> {
        self.read_u256(provider, vault::GET_USER_BALANCE, vec![user.felt()], block)
            .await
    }

    pub async fn total_deposited(
        &self,
        provider: &dyn Provider,
        block: BlockId,
    ) -> Result<U256, RpcError> {
        self.read_u256(provider, vault::GET_TOTAL_DEPOSITED, vec![], block)
            .await
    }

    /// Oracle price of the deposit asset.
    pub async fn asset_price(
        &self,
        provider: &dyn Provider,
        block: BlockId,
    ) -> Result<U256, RpcError> {
        self.read_u256(provider, vault::GET_ASSET_PRICE, vec![], block)
            .await
    }

    pub async fn deposit_fee_rate(
        &self,
        provider: &dyn Provider,
        block: BlockId,
    ) -> Result<U256, RpcError> {
        self.read_u256(provider, vault::GET_DEPOSIT_FEE_RATE, vec![], block)
            .await
    }

    pub async fn is_paused(
        &self,
        provider: &dyn Provider,
        block: BlockId,
    ) -> Result<bool, RpcError> {
        let result = provider
            .call(&self.request(vault::IS_PAUSED, vec![]), block)
            .await?;
        let mut cursor = ResultCursor::new(vault::IS_PAUSED, &result);
        let paused = cursor.next_bool()?;
        cursor.finish()?;
        Ok(paused)
    }

    pub async fn position(
        &self,
        provider: &dyn Provider,
        user: &ContractAddress,
        block: BlockId,
    ) -> Result<VaultPosition, RpcError> {
        let calldata = match self.entrypoints.position_scope {
            PositionScope::User => vec![user.felt()],
            PositionScope::Vault => vec![],
        };
        let result = provider
            .call(&self.request(vault::GET_VAULT_POSITION, calldata), block)
            .await?;
        let mut cursor = ResultCursor::new(vault::GET_VAULT_POSITION, &result);
        let position = VaultPosition {
            collateral: cursor.next_u256()?,
            debt: cursor.next_u256()?,
        };
        cursor.finish()?;
        Ok(position)
    }

    // ── Writes ───────────────────────────────────────────────────────────

    pub fn deposit(&self, amount: U256) -> Call {
        self.amount_call(&self.entrypoints.deposit, amount)
    }

    pub fn withdraw(&self, amount: U256) -> Call {
        self.amount_call(&self.entrypoints.withdraw, amount)
    }

    fn amount_call(&self, entrypoint: &str, amount: U256) -> Call {
        let [low, high] = encode_u256(amount);
        Call {
            to: self.address,
            selector: get_selector_from_name(entrypoint),
            calldata: vec![low, high],
        }
    }
}
