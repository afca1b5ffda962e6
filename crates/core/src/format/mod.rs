//! Human-readable number formatting for gains and token prices

mod percent;
mod price;

pub use percent::{format_percentage, round_percentage};
pub use price::format_price;

/// Round to `places` decimals with halves going away from zero.
///
/// `{:.N}` formatting rounds exact ties to even, so every display tier rounds
/// through here first.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Insert `,` every three digits of an unsigned integer digit string
pub(crate) fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("999999"), "999,999");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_round_to_ties_away_from_zero() {
        assert_eq!(round_to(2.125, 2), 2.13);
        assert_eq!(round_to(-2.125, 2), -2.13);
        assert_eq!(round_to(2500.5, 0), 2501.0);
        assert_eq!(round_to(0.00001, 6), 0.00001);
    }
}
