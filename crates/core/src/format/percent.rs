//! Percentage rounding and display tiers

use super::{group_thousands, round_to};
use crate::models::FormattedPercentage;

/// Round to the precision of the value's magnitude tier.
///
/// `|v| >= 1000` rounds to an integer, `1 <= |v| < 1000` to 2 places and
/// anything smaller to 4 places. Halves round away from zero.
pub fn round_percentage(value: f64) -> f64 {
    let abs = value.abs();
    if abs >= 1_000.0 {
        value.round()
    } else if abs >= 1.0 {
        round_to(value, 2)
    } else {
        round_to(value, 4)
    }
}

/// Signed display string, e.g. `+50.0%`, `-2.35%`, `+14.9K%`, `+1.2M%`.
///
/// Ties round away from zero, matching [`round_percentage`].
fn display_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    let abs = value.abs();

    let body = if abs >= 1_000_000.0 {
        format!("{:.1}M", round_to(abs / 1_000_000.0, 1))
    } else if abs >= 10_000.0 {
        format!("{:.1}K", round_to(abs / 1_000.0, 1))
    } else if abs >= 1_000.0 {
        group_thousands(&format!("{:.0}", abs.round()))
    } else if abs >= 10.0 {
        format!("{:.1}", round_to(abs, 1))
    } else if abs >= 1.0 {
        format!("{:.2}", round_to(abs, 2))
    } else {
        format!("{:.4}", round_to(abs, 4))
    };

    format!("{}{}%", sign, body)
}

/// Rounded value and display string, each computed from the raw `value`
pub fn format_percentage(value: f64) -> FormattedPercentage {
    FormattedPercentage {
        rounded: round_percentage(value),
        text: display_percentage(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: f64) -> String {
        format_percentage(value).text
    }

    #[test]
    fn test_display_tiers() {
        assert_eq!(text(50.0), "+50.0%");
        assert_eq!(text(-50.0), "-50.0%");
        assert_eq!(text(400.0), "+400.0%");
        assert_eq!(text(999_900.0), "+999.9K%");
        assert_eq!(text(14_900.0), "+14.9K%");
        assert_eq!(text(0.5), "+0.5000%");
        assert_eq!(text(2_500_000.0), "+2.5M%");
        assert_eq!(text(-1_234.4), "-1,234%");
        assert_eq!(text(5.678), "+5.68%");
        assert_eq!(text(-100.0), "-100.0%");
    }

    #[test]
    fn test_zero_is_positive() {
        assert_eq!(text(0.0), "+0.0000%");
        assert_eq!(text(-0.0), "+0.0000%");
    }

    #[test]
    fn test_rounding_tiers() {
        assert_eq!(round_percentage(1_234.56), 1_235.0);
        assert_eq!(round_percentage(-2_000.4), -2_000.0);
        assert_eq!(round_percentage(12.3456), 12.35);
        assert_eq!(round_percentage(-1.001), -1.0);
        assert_eq!(round_percentage(0.123456), 0.1235);
        assert_eq!(round_percentage(-0.00004), -0.0);
    }

    #[test]
    fn test_rounding_and_display_are_independent() {
        // 9999.6 rounds to 10000 but displays from the raw value's tier
        let formatted = format_percentage(9_999.6);
        assert_eq!(formatted.rounded, 10_000.0);
        assert_eq!(formatted.text, "+10,000%");

        // 0.99996 keeps four places numerically but displays in the small tier
        let formatted = format_percentage(0.99996);
        assert_eq!(formatted.rounded, 1.0);
        assert_eq!(formatted.text, "+1.0000%");
    }

    #[test]
    fn test_exact_ties_agree_with_rounded_value() {
        let formatted = format_percentage(2_500.5);
        assert_eq!(formatted.rounded, 2_501.0);
        assert_eq!(formatted.text, "+2,501%");

        let formatted = format_percentage(1.125);
        assert_eq!(formatted.rounded, 1.13);
        assert_eq!(formatted.text, "+1.13%");

        let formatted = format_percentage(-1.125);
        assert_eq!(formatted.rounded, -1.13);
        assert_eq!(formatted.text, "-1.13%");

        assert_eq!(text(10.25), "+10.3%");
        assert_eq!(text(12_250.0), "+12.3K%");
    }
}
