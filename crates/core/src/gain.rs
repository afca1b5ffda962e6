//! Gain calculation from an entry/exit price pair

use crate::errors::GainError;
use crate::models::{FormattedFigures, GainResult, ValidatedRequest};
use crate::types::Percent;

/// Percentage gain from `entry_price` to `current_price`.
///
/// Both inputs are expected to be finite. Zero change is reported as profit.
pub fn compute_gain(entry_price: f64, current_price: f64) -> Result<GainResult, GainError> {
    if entry_price <= 0.0 {
        return Err(GainError::InvalidEntryPrice(entry_price));
    }
    if current_price < 0.0 {
        return Err(GainError::InvalidCurrentPrice(current_price));
    }

    let percentage = Percent::new((current_price - entry_price) / entry_price * 100.0);

    Ok(GainResult {
        percentage,
        is_profit: percentage.is_profit(),
    })
}

/// Gain for an already validated request
pub fn gain_for(request: &ValidatedRequest) -> Result<GainResult, GainError> {
    compute_gain(
        request.entry_price().as_f64(),
        request.current_price().as_f64(),
    )
}

/// Display strings for the card, all derived from raw values
pub fn format_figures(request: &ValidatedRequest, gain: &GainResult) -> FormattedFigures {
    FormattedFigures {
        gain_text: gain.percentage.display(),
        entry_price_text: request.entry_price().display(),
        current_price_text: request.current_price().display(),
    }
}
