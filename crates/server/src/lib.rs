//! PnL Card Server - HTTP front end for the card pipeline

pub mod config;
pub mod error;
pub mod routes;
mod state;

pub use config::{ConfigError, ServerConfig};
pub use routes::build_router;
pub use state::{load_renderer, AppState, MetricsSnapshot, RequestMetrics};
