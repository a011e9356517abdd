//! Network constants for the BTC vault deployment on Starknet Sepolia.

use std::time::Duration;

/// Default public Sepolia JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://starknet-sepolia.public.blastapi.io/rpc/v0_8";

/// WBTC (deposit asset) on Sepolia.
pub const WBTC_ADDRESS: &str =
    "0xabbd6f1e590eb83addd87ba5ac27960d859b1f17d11a3c1cd6a0006704b1410";

/// rbBTC, the vault's receipt token.
pub const RB_BTC_ADDRESS: &str =
    "0x6bc02e5684bf7174af01d5c4d72303cb89338a3cc6df719c46a634521198364";

/// The BTC vault contract.
pub const BTC_VAULT_ADDRESS: &str =
    "0x49e64c4b60ee6d18b49fe198eed2f79ee74ceb719c74a6882eeea35a0c5b0d1";

/// WBTC decimal precision.
pub const WBTC_DECIMALS: u8 = 8;

/// How often an active session's snapshot is re-read.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ContractAddress;

    #[test]
    fn test_network_constants_are_valid_felts() {
        for addr in [
            WBTC_ADDRESS,
            RB_BTC_ADDRESS,
            BTC_VAULT_ADDRESS,
        ] {
            assert!(ContractAddress::from_hex(addr).is_ok(), "{addr}");
        }
    }
}
