//! Shared type definitions and newtypes

use serde::{Deserialize, Serialize};

use crate::format::{format_percentage, format_price, round_percentage};

/// Price per token in USD
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Price(pub f64);

impl Price {
    pub fn new(price: f64) -> Self {
        Price(price)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Human-readable `$` string, see [`format_price`]
    pub fn display(&self) -> String {
        format_price(self.0)
    }
}

/// Signed percentage change (50.0 means +50%)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Percent(pub f64);

impl Percent {
    pub fn new(value: f64) -> Self {
        Percent(value)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Zero change counts as profit
    pub fn is_profit(&self) -> bool {
        self.0 >= 0.0
    }

    /// Value rounded to its magnitude tier
    pub fn rounded(&self) -> f64 {
        round_percentage(self.0)
    }

    /// Signed display string with K/M compaction
    pub fn display(&self) -> String {
        format_percentage(self.0).text
    }
}
