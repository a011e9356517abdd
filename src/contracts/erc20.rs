//! ERC-20 binding, used for both the deposit asset (WBTC) and the vault's
//! share token (rbBTC).

use alloy_primitives::U256;

use crate::contracts::calldata::{encode_u256, get_selector_from_name, ResultCursor};
use crate::contracts::constants::erc20;
use crate::contracts::{BlockId, Call, FunctionCall};
use crate::error::RpcError;
use crate::rpc::Provider;
use crate::shared::ContractAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20 {
    address: ContractAddress,
}

impl Erc20 {
    pub fn new(address: ContractAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    pub fn balance_of_request(&self, owner: &ContractAddress) -> FunctionCall {
        FunctionCall {
            contract_address: self.address,
            entry_point_selector: get_selector_from_name(erc20::BALANCE_OF),
            calldata: vec![owner.felt()],
        }
    }

    pub async fn balance_of(
        &self,
        provider: &dyn Provider,
        owner: &ContractAddress,
        block: BlockId,
    ) -> Result<U256, RpcError> {
        let result = provider.call(&self.balance_of_request(owner), block).await?;
        let mut cursor = ResultCursor::new(erc20::BALANCE_OF, &result);
        let balance = cursor.next_u256()?;
        cursor.finish()?;
        Ok(balance)
    }

    /// Build an `approve(spender, amount)` call for the wallet to execute.
    pub fn approve(&self, spender: &ContractAddress, amount: U256) -> Call {
        let [low, high] = encode_u256(amount);
        Call {
            to: self.address,
            selector: get_selector_from_name(erc20::APPROVE),
            calldata: vec![spender.felt(), low, high],
        }
    }
}
