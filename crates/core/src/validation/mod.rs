//! Request validation at the untyped boundary
//!
//! Turns a JSON field bag into a [`ValidatedRequest`] or the full list of
//! field errors. Nothing past this module sees untyped data.

mod sanitize;

pub use sanitize::{sanitize_text, sanitize_ticker};

use serde_json::{Map, Value};

use crate::errors::ValidationErrors;
use crate::models::{Theme, ValidatedRequest};

pub const MAX_TICKER_LEN: usize = 20;
pub const MAX_TAG_LEN: usize = 50;
pub const MAX_TIMESTAMP_LEN: usize = 100;
pub const MIN_ENTRY_PRICE: f64 = 1e-20;
pub const MAX_PRICE: f64 = 1e15;

/// Strip exactly one `{"body": {...}}` wrapper if present
pub fn unwrap_body(raw: &Value) -> &Value {
    match raw.get("body") {
        Some(inner) if inner.is_object() => inner,
        _ => raw,
    }
}

/// Validate and sanitise every field, collecting all failures.
///
/// Expects the field bag itself; call [`unwrap_body`] first when the caller
/// may send a wrapped body.
pub fn validate(raw: &Value) -> Result<ValidatedRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let Some(fields) = raw.as_object() else {
        errors.push("body", "must be a JSON object");
        return Err(errors);
    };

    let ticker = ticker(fields, &mut errors);
    let entry_price = entry_price(fields, &mut errors);
    let current_price = current_price(fields, &mut errors);
    let theme = theme(fields, &mut errors);
    let tag = optional_text(fields, "tag", MAX_TAG_LEN, &mut errors);
    let timestamp = optional_text(fields, "timestamp", MAX_TIMESTAMP_LEN, &mut errors);

    match (ticker, entry_price, current_price, theme) {
        (Some(ticker), Some(entry), Some(current), Some(theme)) if errors.is_empty() => Ok(
            ValidatedRequest::new(ticker, entry, current, theme, tag, timestamp),
        ),
        _ => Err(errors),
    }
}

/// Field value, treating JSON `null` as absent
fn present<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn ticker(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    let Some(value) = present(fields, "ticker") else {
        errors.push("ticker", "is required");
        return None;
    };
    let Some(raw) = value.as_str() else {
        errors.push("ticker", "must be a string");
        return None;
    };
    if raw.trim().is_empty() {
        errors.push("ticker", "is required");
        return None;
    }

    let ticker = sanitize_ticker(raw.trim());
    if ticker.is_empty() {
        errors.push("ticker", "must contain at least one letter, digit or $");
        return None;
    }
    Some(ticker)
}

fn number(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let Some(value) = present(fields, name) else {
        errors.push(name, "is required");
        return None;
    };
    match value.as_f64() {
        Some(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(name, "must be a finite number");
            None
        }
    }
}

fn entry_price(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<f64> {
    let price = number(fields, "entryPrice", errors)?;
    if price <= 0.0 {
        errors.push("entryPrice", "must be greater than 0");
        None
    } else if price < MIN_ENTRY_PRICE {
        errors.push("entryPrice", format!("must be at least {:e}", MIN_ENTRY_PRICE));
        None
    } else if price > MAX_PRICE {
        errors.push("entryPrice", format!("must be at most {:e}", MAX_PRICE));
        None
    } else {
        Some(price)
    }
}

fn current_price(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<f64> {
    let price = number(fields, "currentPrice", errors)?;
    if price < 0.0 {
        errors.push("currentPrice", "cannot be negative");
        None
    } else if price > MAX_PRICE {
        errors.push("currentPrice", format!("must be at most {:e}", MAX_PRICE));
        None
    } else {
        Some(price)
    }
}

fn theme(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<Theme> {
    let Some(value) = present(fields, "theme") else {
        return Some(Theme::default());
    };
    match value.as_str().and_then(Theme::from_name) {
        Some(theme) => Some(theme),
        None => {
            errors.push("theme", "must be one of dark, light, degen");
            None
        }
    }
}

/// Optional free text. The length ceiling applies to the raw string, before
/// stripping; text that strips down to nothing is treated as absent.
fn optional_text(
    fields: &Map<String, Value>,
    name: &str,
    max_len: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = present(fields, name)?;
    let Some(raw) = value.as_str() else {
        errors.push(name, "must be a string");
        return None;
    };
    if raw.chars().count() > max_len {
        errors.push(name, format!("must be at most {} characters", max_len));
        return None;
    }

    let clean = sanitize_text(raw);
    (!clean.is_empty()).then_some(clean)
}
