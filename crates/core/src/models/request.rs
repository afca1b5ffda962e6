//! Validated card request

use serde::Serialize;

use super::Theme;
use crate::types::Price;

/// A request whose every field has passed its own constraint.
///
/// Only [`crate::validation::validate`] builds one, so a partially valid
/// request cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRequest {
    ticker: String,
    entry_price: Price,
    current_price: Price,
    theme: Theme,
    tag: Option<String>,
    timestamp: Option<String>,
}

impl ValidatedRequest {
    pub(crate) fn new(
        ticker: String,
        entry_price: f64,
        current_price: f64,
        theme: Theme,
        tag: Option<String>,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            ticker,
            entry_price: Price::new(entry_price),
            current_price: Price::new(current_price),
            theme,
            tag,
            timestamp,
        }
    }

    /// Upper-cased symbol restricted to `[A-Z0-9$]`, at most 20 chars
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn entry_price(&self) -> Price {
        self.entry_price
    }

    pub fn current_price(&self) -> Price {
        self.current_price
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Fill in a caller-formatted timestamp when the request carried none
    pub fn with_default_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        if self.timestamp.is_none() {
            self.timestamp = Some(timestamp.into());
        }
        self
    }
}
