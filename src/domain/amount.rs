use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Decimal places kept for amounts read from a feed.
pub const AMOUNT_DECIMALS: u32 = 4;

/// Parses a plain decimal literal such as `100`, `-5` or `12.34567`.
/// Extra precision is rounded half-to-even to [`AMOUNT_DECIMALS`].
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() || s.contains(['e', 'E', '_']) {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .map(|d| d.round_dp(AMOUNT_DECIMALS))
}

/// `serde(deserialize_with)` helper for optional amount columns.
/// Empty cells become `None`; malformed values are an error.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_amount(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid amount format: {}", s))),
    }
}
