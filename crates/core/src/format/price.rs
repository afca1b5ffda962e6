//! Token price display tiers

use super::{group_thousands, round_to};

/// Prices below this use the compact leading-zero notation
const MICRO_PRICE: f64 = 0.00001;

/// Fractional digits inspected when decomposing a micro price
const DECOMPOSE_DIGITS: usize = 20;

/// Significant digits kept after the zero run
const SIGNIFICANT_DIGITS: usize = 4;

/// Format a token price for display.
///
/// Tiers are checked top to bottom:
/// - `<= 0` (or not finite): `$0`
/// - `< 0.00001`: `$0.0{<zeros>}<digits>`, e.g. `0.0000024` is `$0.0{5}2400`
/// - `>= 1M`: `$1.23M`
/// - `>= 1K`: `$12,345.6` (at most 2 decimals)
/// - `>= 1`: 2 decimals, `>= 0.01`: 4 decimals, otherwise 6 decimals
///
/// A micro price with no non-zero digit in its first 20 decimals falls back to
/// scientific notation, e.g. `$1.00e-25`.
pub fn format_price(price: f64) -> String {
    if price.is_nan() || price <= 0.0 || price.is_infinite() {
        return "$0".to_string();
    }

    if price < MICRO_PRICE {
        return compact_micro_price(price).unwrap_or_else(|| scientific(price));
    }

    if price >= 1_000_000.0 {
        format!("${:.2}M", round_to(price / 1_000_000.0, 2))
    } else if price >= 1_000.0 {
        format!("${}", grouped_two_decimals(price))
    } else if price >= 1.0 {
        format!("${:.2}", round_to(price, 2))
    } else if price >= 0.01 {
        format!("${:.4}", round_to(price, 4))
    } else {
        format!("${:.6}", round_to(price, 6))
    }
}

fn scientific(price: f64) -> String {
    format!("${:.2e}", price)
}

/// `$0.0{n}dddd` where `n` counts the zeros between the point and the first
/// significant digit. `None` when the fixed expansion holds only zeros.
///
/// The significant digits are truncated, not rounded: `9.999999999e-6` gives
/// `$0.0{5}9999`.
fn compact_micro_price(price: f64) -> Option<String> {
    let fixed = format!("{:.*}", DECOMPOSE_DIGITS, price);
    let fraction = fixed.strip_prefix("0.")?;

    let zeros = fraction.bytes().take_while(|b| *b == b'0').count();
    if zeros == 0 || zeros == fraction.len() {
        return None;
    }

    let end = (zeros + SIGNIFICANT_DIGITS).min(fraction.len());
    let digits = &fraction[zeros..end];

    Some(format!("$0.0{{{}}}{}", zeros, digits))
}

/// Thousands-grouped with up to two decimals, trailing zeros dropped
fn grouped_two_decimals(price: f64) -> String {
    let fixed = format!("{:.2}", round_to(price, 2));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    if frac.is_empty() {
        group_thousands(int_part)
    } else {
        format!("{}.{}", group_thousands(int_part), frac)
    }
}
