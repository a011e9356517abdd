//! Pure conversion between human-readable decimal amounts and base units.
//!
//! Parsing uses `rust_decimal::Decimal` for exact arithmetic; on-chain values
//! are `U256`. No async, no network calls.

use alloy_primitives::U256;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while converting a user-entered amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("'{input}' is not a decimal number")]
    Unparseable { input: String },

    #[error("amount must be positive, got {0}")]
    NonPositive(String),

    #[error("'{input}' has more than {decimals} fractional digits")]
    TooPrecise { input: String, decimals: u8 },

    #[error("overflow: {context}")]
    Overflow { context: String },

    #[error("amount {requested} exceeds available balance {available}")]
    ExceedsBalance { requested: U256, available: U256 },
}

/// Convert a decimal string into base units at the given precision.
///
/// ```text
/// base_units = amount * 10^decimals
/// ```
///
/// Only plain decimals (`123`, `0.5`) are accepted: no sign, exponent,
/// separators or leading dot. Rejects zero and anything with more fractional
/// digits than `decimals`.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    let unparseable = || AmountError::Unparseable {
        input: input.to_string(),
    };

    // digits, optionally followed by '.' and more digits
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    if !is_digits(whole) || (trimmed.contains('.') && !is_digits(frac)) {
        return Err(unparseable());
    }
    if frac.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            input: input.to_string(),
            decimals,
        });
    }

    let amount = Decimal::from_str_exact(trimmed).map_err(|_| AmountError::Overflow {
        context: format!("'{}' exceeds decimal precision", trimmed),
    })?;

    if amount <= Decimal::ZERO {
        return Err(AmountError::NonPositive(amount.to_string()));
    }

    let multiplier = 10u64
        .checked_pow(decimals as u32)
        .map(Decimal::from)
        .ok_or_else(|| AmountError::Overflow {
            context: format!("10^{} overflow", decimals),
        })?;

    let scaled = amount
        .checked_mul(multiplier)
        .ok_or_else(|| AmountError::Overflow {
            context: format!("{} * 10^{}", amount, decimals),
        })?;

    let units = scaled.to_u128().ok_or_else(|| AmountError::Overflow {
        context: format!("{} does not fit in u128", scaled),
    })?;

    Ok(U256::from(units))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Render base units as a plain decimal string, trimming trailing zeros.
///
/// `format_units(500_000_000, 8) == "5"`, `format_units(1, 8) == "0.00000001"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

/// Convert base units into a `Decimal`, if it fits in `Decimal`'s 96-bit mantissa.
pub fn to_decimal(value: U256, decimals: u8) -> Option<Decimal> {
    let raw = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(raw, decimals as u32)
        .ok()
        .map(|d| d.normalize())
}
