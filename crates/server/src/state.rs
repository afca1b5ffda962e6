//! Application state shared by the route handlers

use pnlcard_render::SkiaFactory;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Request tallies. Kept here so the core stays free of shared state.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    cards: AtomicU64,
    gains: AtomicU64,
    validation_failures: AtomicU64,
    render_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub cards: u64,
    pub gains: u64,
    pub validation_failures: u64,
    pub render_failures: u64,
}

impl RequestMetrics {
    pub fn card_rendered(&self) {
        self.cards.fetch_add(1, Ordering::Relaxed);
    }

    pub fn gain_computed(&self) {
        self.gains.fetch_add(1, Ordering::Relaxed);
    }

    pub fn validation_failed(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_failed(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cards: self.cards.load(Ordering::Relaxed),
            gains: self.gains.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
        }
    }
}

/// Global state cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<SkiaFactory>,
    pub stamp_time: bool,
    pub metrics: Arc<RequestMetrics>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(renderer: SkiaFactory, stamp_time: bool) -> Self {
        Self {
            renderer: Arc::new(renderer),
            stamp_time,
            metrics: Arc::new(RequestMetrics::default()),
            started_at: Instant::now(),
        }
    }
}

/// Build the raster backend from the configured font, falling back to the
/// bundled font and, failing that, to text-less cards
pub fn load_renderer(font_path: Option<&Path>) -> SkiaFactory {
    if let Some(path) = font_path {
        match std::fs::read(path).map(SkiaFactory::from_font_bytes) {
            Ok(Ok(factory)) => {
                info!("Loaded card font from {}", path.display());
                return factory;
            }
            Ok(Err(e)) => warn!("Failed to parse font {}: {}", path.display(), e),
            Err(e) => warn!("Failed to read font {}: {}", path.display(), e),
        }
    }

    match SkiaFactory::bundled() {
        Ok(factory) => {
            info!("Using bundled card font");
            factory
        }
        Err(e) => {
            warn!("Bundled font unusable, cards will render without text: {}", e);
            SkiaFactory::without_font()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnlcard_render::SurfaceFactory;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = RequestMetrics::default();
        metrics.card_rendered();
        metrics.card_rendered();
        metrics.validation_failed();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                cards: 2,
                gains: 0,
                validation_failures: 1,
                render_failures: 0,
            }
        );
    }

    #[test]
    fn test_unset_font_uses_bundled() {
        assert!(load_renderer(None).has_font());
    }

    #[test]
    fn test_unreadable_font_falls_back_to_bundled() {
        assert!(load_renderer(Some(Path::new("/nonexistent/font.ttf"))).has_font());

        let garbage = std::env::temp_dir().join("pnlcard-not-a-font.ttf");
        std::fs::write(&garbage, b"not a font").unwrap();
        assert!(load_renderer(Some(&garbage)).has_font());
        std::fs::remove_file(&garbage).ok();
    }
}
