//! Conversion between human-readable decimal strings and smallest token units.

use alloy_primitives::U256;

use crate::{Result, TintError};

fn invalid(input: &str, reason: impl Into<String>) -> TintError {
    TintError::InvalidAmount {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Parse a non-negative decimal string into smallest units.
///
/// Accepts digits with at most one `.`; rejects signs, exponents, more
/// fractional digits than `decimals`, and values that overflow 256 bits.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256> {
    let text = input.trim();
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid(input, "empty amount"));
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, "expected digits and at most one '.'"));
    }
    if frac.len() > usize::from(decimals) {
        return Err(invalid(
            input,
            format!("more than {decimals} fractional digits"),
        ));
    }

    let overflow = || invalid(input, "exceeds 256 bits");
    let ten = U256::from(10u8);
    let mut value = U256::ZERO;
    let padding = usize::from(decimals) - frac.len();
    let digits = whole
        .bytes()
        .chain(frac.bytes())
        .chain(std::iter::repeat_n(b'0', padding));
    for digit in digits {
        value = value
            .checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(digit - b'0')))
            .ok_or_else(overflow)?;
    }
    Ok(value)
}

/// Render smallest units as a decimal string, keeping at least one
/// fractional digit (`1000000` with 6 decimals is `"1.0"`).
#[must_use]
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return format!("{digits}.0");
    }
    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals - digits.len() + 1))
    } else {
        digits
    };
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{frac}")
    }
}
