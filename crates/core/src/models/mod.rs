//! Data models for the card pipeline

mod gain;
mod request;
mod theme;

pub use gain::*;
pub use request::*;
pub use theme::*;
