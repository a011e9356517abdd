//! On-chain contract interaction: selectors, Cairo serialization, bindings.
//!
//! Bindings never talk to the network themselves. Reads are described as
//! [`FunctionCall`]s handed to a [`Provider`](crate::rpc::Provider); writes are
//! described as [`Call`]s handed to the wallet's
//! [`Account`](crate::wallet::Account) for execution.

pub mod calldata;
pub mod constants;
pub mod erc20;
pub mod vault;

pub use calldata::{get_selector_from_name, starknet_keccak};
pub use erc20::Erc20;
pub use vault::{BtcVault, PositionScope, VaultEntrypoints, VaultPosition};

use serde::{Deserialize, Serialize};

use crate::shared::{ContractAddress, Felt};

/// A read-only invocation, the `request` object of `starknet_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub contract_address: ContractAddress,
    pub entry_point_selector: Felt,
    pub calldata: Vec<Felt>,
}

/// A state-changing invocation, executed by the user's account contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub to: ContractAddress,
    pub selector: Felt,
    pub calldata: Vec<Felt>,
}

/// Block to evaluate a read against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockId {
    #[default]
    Latest,
    Pending,
    Number(u64),
    Hash(Felt),
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Number(n) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("block_number", n)?;
                map.end()
            }
            BlockId::Hash(h) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("block_hash", h)?;
                map.end()
            }
        }
    }
}
