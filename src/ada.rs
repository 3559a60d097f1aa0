use crate::error::{Error, Result};
use crate::value::ValueError;

pub const LOVELACE_PER_ADA: u64 = 1_000_000;
const DECIMALS: usize = 6;

/// Parses a decimal ADA amount such as `"1.5"` into lovelace without going through floats.
pub fn parse_ada(amount: &str) -> Result<u64> {
    let invalid = || Error::Value(ValueError::InvalidAmount(amount.to_owned()));

    let amount_trimmed = amount.trim();
    let (whole, fraction) = match amount_trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount_trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty()
        || fraction.len() > DECIMALS
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: u64 = format!("{fraction:0<DECIMALS$}")
        .parse()
        .map_err(|_| invalid())?;

    whole
        .checked_mul(LOVELACE_PER_ADA)
        .and_then(|lovelace| lovelace.checked_add(fraction))
        .ok_or_else(|| Error::Value(ValueError::Overflow(format!("{amount} ADA"))))
}

/// Renders lovelace as ADA, dropping trailing zeros of the fractional part.
pub fn format_ada(lovelace: u64) -> String {
    let whole = lovelace / LOVELACE_PER_ADA;
    let fraction = lovelace % LOVELACE_PER_ADA;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:0>DECIMALS$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}
