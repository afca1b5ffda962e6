//! PnL Card Render - Card composition over a pluggable drawing surface

pub mod backend;
pub mod composer;
pub mod error;
pub mod palette;
pub mod surface;

/// Card width in pixels
pub const CARD_WIDTH: u32 = 1200;
/// Card height in pixels
pub const CARD_HEIGHT: u32 = 630;

pub use backend::{RecordingFactory, SkiaFactory};
pub use composer::{compose_card, draw_card, render_card, CardSpec};
pub use error::RenderError;
pub use palette::Palette;
pub use surface::{Surface, SurfaceFactory};
