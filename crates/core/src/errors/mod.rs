//! Error types and Result alias for the card pipeline

use serde::Serialize;
use thiserror::Error;

/// A single rejected request field
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field-level problem found in one request, reported together
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("{}", join_fields(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Price pair that has no defined gain
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GainError {
    #[error("Entry price must be greater than zero (got {0})")]
    InvalidEntryPrice(f64),

    #[error("Current price cannot be negative (got {0})")]
    InvalidCurrentPrice(f64),
}

/// Main error type for the card pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Domain(#[from] GainError),

    #[error("Render failed: {0}")]
    Render(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
