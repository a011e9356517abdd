//! Cairo serialization helpers and entrypoint selector derivation.
//!
//! Cairo ABI rules used here:
//! - `felt252` / `ContractAddress` → one felt
//! - `bool` → one felt, `0` or `1`
//! - `u256` → two felts, `[low_128, high_128]`
//! - structs → their fields in declaration order

use alloy_primitives::U256;
use sha3::{Digest, Keccak256};

use crate::error::RpcError;
use crate::shared::Felt;

/// Keccak-256 of `data`, truncated to its low 250 bits.
pub fn starknet_keccak(data: &[u8]) -> Felt {
    let mut hash: [u8; 32] = Keccak256::digest(data).into();
    hash[0] &= 0x03;
    // < 2^250, always below the field prime
    Felt::from_be_bytes(hash).unwrap_or_default()
}

/// Entrypoint selector for a Cairo function name.
pub fn get_selector_from_name(name: &str) -> Felt {
    starknet_keccak(name.as_bytes())
}

/// Split a `u256` into its `[low, high]` calldata felts.
pub fn encode_u256(value: U256) -> [Felt; 2] {
    let limbs = value.as_limbs();
    let low = (limbs[0] as u128) | ((limbs[1] as u128) << 64);
    let high = (limbs[2] as u128) | ((limbs[3] as u128) << 64);
    [Felt::from(low), Felt::from(high)]
}

/// Sequential reader over a call's return data.
pub struct ResultCursor<'a> {
    entrypoint: &'a str,
    data: &'a [Felt],
    pos: usize,
}

impl<'a> ResultCursor<'a> {
    pub fn new(entrypoint: &'a str, data: &'a [Felt]) -> Self {
        Self {
            entrypoint,
            data,
            pos: 0,
        }
    }

    fn error(&self, reason: String) -> RpcError {
        RpcError::UnexpectedResult {
            entrypoint: self.entrypoint.to_string(),
            reason,
        }
    }

    pub fn next_felt(&mut self) -> Result<Felt, RpcError> {
        let felt = self.data.get(self.pos).copied().ok_or_else(|| {
            self.error(format!(
                "expected at least {} felts, got {}",
                self.pos + 1,
                self.data.len()
            ))
        })?;
        self.pos += 1;
        Ok(felt)
    }

    pub fn next_u256(&mut self) -> Result<U256, RpcError> {
        let low = self.next_felt()?.to_u256();
        let high = self.next_felt()?.to_u256();

        let limit = U256::from(u128::MAX);
        if low > limit || high > limit {
            return Err(self.error("u256 limb exceeds 128 bits".to_string()));
        }
        Ok(low | (high << 128usize))
    }

    pub fn next_bool(&mut self) -> Result<bool, RpcError> {
        let felt = self.next_felt()?;
        if felt == Felt::ZERO {
            Ok(false)
        } else if felt == Felt::ONE {
            Ok(true)
        } else {
            Err(self.error(format!("expected bool, got {}", felt)))
        }
    }

    /// Fail if any return data was left unread.
    pub fn finish(self) -> Result<(), RpcError> {
        if self.pos != self.data.len() {
            return Err(self.error(format!(
                "expected {} felts, got {}",
                self.pos,
                self.data.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        assert_eq!(
            get_selector_from_name("transfer"),
            Felt::from_hex("0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e")
                .unwrap()
        );
        assert_eq!(
            get_selector_from_name("approve"),
            Felt::from_hex("0x219209e083275171774dab1df80982e9df2096516f06319c5c6d71ae0a8480c")
                .unwrap()
        );
    }

    #[test]
    fn test_selector_fits_in_250_bits() {
        for name in ["deposit", "withdraw", "get_user_balance", "is_paused"] {
            let selector = get_selector_from_name(name).to_u256();
            assert!(selector < (U256::from(1u64) << 250usize), "{name}");
        }
    }

    #[test]
    fn test_encode_u256_splits_low_high() {
        let [low, high] = encode_u256(U256::from(200_000_000u64));
        assert_eq!(low, Felt::from(200_000_000u64));
        assert_eq!(high, Felt::ZERO);

        let big = (U256::from(3u64) << 128usize) | U256::from(5u64);
        let [low, high] = encode_u256(big);
        assert_eq!(low, Felt::from(5u64));
        assert_eq!(high, Felt::from(3u64));

        let [low, high] = encode_u256(U256::MAX);
        assert_eq!(low, Felt::from(u128::MAX));
        assert_eq!(high, Felt::from(u128::MAX));
    }

    #[test]
    fn test_cursor_reads_u256_and_bool() {
        let data = [
            Felt::from(5u64),
            Felt::from(3u64),
            Felt::ONE,
        ];
        let mut cursor = ResultCursor::new("test", &data);
        assert_eq!(
            cursor.next_u256().unwrap(),
            (U256::from(3u64) << 128usize) | U256::from(5u64)
        );
        assert!(cursor.next_bool().unwrap());
        cursor.finish().unwrap();
    }

    #[test]
    fn test_cursor_rejects_short_and_long_results() {
        let data = [Felt::from(1u64)];
        let mut cursor = ResultCursor::new("balance_of", &data);
        let err = cursor.next_u256().unwrap_err();
        assert!(err.to_string().contains("balance_of"));

        let data = [Felt::ONE, Felt::ZERO];
        let mut cursor = ResultCursor::new("is_paused", &data);
        cursor.next_bool().unwrap();
        assert!(cursor.finish().is_err());
    }

    #[test]
    fn test_cursor_rejects_non_bool() {
        let data = [Felt::from(2u64)];
        let mut cursor = ResultCursor::new("is_paused", &data);
        assert!(cursor.next_bool().is_err());
    }
}
