//! Entrypoint names of the token and vault contracts.
//!
//! Selectors are derived from these with
//! [`get_selector_from_name`](super::get_selector_from_name).

/// ERC-20 entrypoints (asset token and share token).
pub mod erc20 {
    pub const BALANCE_OF: &str = "balance_of";
    pub const APPROVE: &str = "approve";
}

/// BTC vault entrypoints.
pub mod vault {
    pub const GET_USER_BALANCE: &str = "get_user_balance";
    pub const GET_TOTAL_DEPOSITED: &str = "get_total_deposited";
    pub const GET_ASSET_PRICE: &str = "get_asset_price";
    pub const IS_PAUSED: &str = "is_paused";
    pub const GET_DEPOSIT_FEE_RATE: &str = "get_deposit_fee_rate";
    pub const GET_VAULT_POSITION: &str = "get_vault_position";
    pub const DEPOSIT: &str = "deposit";
    pub const WITHDRAW: &str = "withdraw";

    /// Write entrypoints of the vault revision that routes funds into Vesu.
    pub const DEPOSIT_TO_VESU: &str = "deposit_to_vesu";
    pub const WITHDRAW_FROM_VESU: &str = "withdraw_from_vesu";
}
