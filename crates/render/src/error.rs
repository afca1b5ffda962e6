//! Rendering errors

use thiserror::Error;

/// Failure inside the drawing backend
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing surface error: {0}")]
    Surface(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl From<RenderError> for pnlcard_core::Error {
    fn from(err: RenderError) -> Self {
        pnlcard_core::Error::Render(err.to_string())
    }
}
