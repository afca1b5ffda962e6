//! PnL Card Core - Gain calculation, number formatting, and request validation
//!
//! Every function here is pure: no I/O, no logging, no shared state.

pub mod errors;
pub mod format;
pub mod gain;
pub mod models;
pub mod types;
pub mod validation;

pub use errors::{Error, FieldError, GainError, Result, ValidationErrors};
pub use format::{format_percentage, format_price, round_percentage};
pub use gain::{compute_gain, format_figures, gain_for};
pub use models::*;
pub use types::*;
pub use validation::{unwrap_body, validate};
