//! Gain and its derived display strings

use serde::Serialize;

use crate::types::Percent;

/// Signed percentage change from entry to current price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GainResult {
    pub percentage: Percent,
    pub is_profit: bool,
}

/// Percentage rounded to its tier plus its display string.
///
/// Both come from the same raw value; `text` is not derived from `rounded`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPercentage {
    pub rounded: f64,
    pub text: String,
}

/// Strings drawn on the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFigures {
    pub gain_text: String,
    pub entry_price_text: String,
    pub current_price_text: String,
}
