//! Shared newtypes and utilities used across all layers.
//!
//! These types are serialization-transparent: they serialize/deserialize as the
//! `0x`-prefixed hex strings Starknet JSON-RPC nodes send, so they can be used
//! directly in wire types without conversion overhead.

pub mod units;

pub use units::{format_units, parse_units, to_decimal, AmountError};

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing or range-checking a field element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeltError {
    #[error("'{input}' is not a valid field element: {reason}")]
    Invalid { input: String, reason: String },

    #[error("value {0} is not below the field prime")]
    OutOfRange(U256),
}

// ─── Felt ────────────────────────────────────────────────────────────────────

/// The Starknet field prime: `2^251 + 17 * 2^192 + 1`.
pub const FIELD_PRIME: U256 = U256::from_limbs([1, 0, 0, 0x0800_0000_0000_0011]);

/// A Starknet field element: the unit of calldata and return data.
///
/// Always strictly below [`FIELD_PRIME`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt(U256);

impl Felt {
    pub const ZERO: Felt = Felt(U256::ZERO);
    pub const ONE: Felt = Felt(U256::from_limbs([1, 0, 0, 0]));

    /// Range-checked conversion from a 256-bit integer.
    pub fn from_u256(value: U256) -> Result<Self, FeltError> {
        if value >= FIELD_PRIME {
            return Err(FeltError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Build from 32 big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, FeltError> {
        Self::from_u256(U256::from_be_bytes(bytes))
    }

    /// Parse a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, FeltError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.is_empty() || digits.len() > 64 {
            return Err(FeltError::Invalid {
                input: s.to_string(),
                reason: format!("expected 1-64 hex digits, got {}", digits.len()),
            });
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|e| FeltError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_be_bytes(bytes)
    }

    pub fn to_u256(&self) -> U256 {
        self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes::<32>()
    }

    /// Minimal `0x`-prefixed lowercase hex, as JSON-RPC nodes emit it.
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.to_be_bytes());
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    /// `0x` followed by all 64 hex digits.
    pub fn to_fixed_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl From<u128> for Felt {
    fn from(v: u128) -> Self {
        Self(U256::from(v))
    }
}

impl From<u64> for Felt {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl From<bool> for Felt {
    fn from(v: bool) -> Self {
        if v {
            Felt::ONE
        } else {
            Felt::ZERO
        }
    }
}

impl std::fmt::Display for Felt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Felt {
    type Err = FeltError;

    /// Hex when `0x`-prefixed, decimal otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") || s.starts_with("0X") {
            return Self::from_hex(s);
        }
        let value = U256::from_str(s).map_err(|e| FeltError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_u256(value)
    }
}

impl Serialize for Felt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Felt::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ─── ContractAddress ─────────────────────────────────────────────────────────

/// A Starknet contract or account address.
///
/// Displays in the full 64-digit form wallets show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ContractAddress(Felt);

impl ContractAddress {
    pub fn new(felt: Felt) -> Self {
        Self(felt)
    }

    pub fn from_hex(s: &str) -> Result<Self, FeltError> {
        Felt::from_hex(s).map(Self)
    }

    pub fn felt(&self) -> Felt {
        self.0
    }
}

impl std::fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_fixed_hex())
    }
}

impl From<Felt> for ContractAddress {
    fn from(felt: Felt) -> Self {
        Self(felt)
    }
}

impl FromStr for ContractAddress {
    type Err = FeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Felt::from_str(s).map(Self)
    }
}

impl Serialize for ContractAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_fixed_hex())
    }
}

impl<'de> Deserialize<'de> for ContractAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Felt::deserialize(deserializer).map(Self)
    }
}

// ─── TransactionHash ─────────────────────────────────────────────────────────

/// Identifier of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(Felt);

impl TransactionHash {
    pub fn new(felt: Felt) -> Self {
        Self(felt)
    }

    pub fn felt(&self) -> Felt {
        self.0
    }
}

impl std::fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_fixed_hex())
    }
}

impl FromStr for TransactionHash {
    type Err = FeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Felt::from_str(s).map(Self)
    }
}
