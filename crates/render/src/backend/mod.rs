//! Drawing backends

pub mod recording;
pub mod skia;

pub use recording::{RecordingFactory, RecordingSurface};
pub use skia::{SkiaFactory, SkiaSurface};
