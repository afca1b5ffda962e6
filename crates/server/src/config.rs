//! Server configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

/// Default port for the card server
const DEFAULT_PORT: u16 = 3000;

/// Default request body ceiling in bytes
const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Bold sans-serif TTF/OTF used for all card text
    pub font_path: Option<PathBuf>,
    pub body_limit: usize,
    /// Supply a wall-clock timestamp when a card request has none
    pub stamp_time: bool,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            font_path: None,
            body_limit: DEFAULT_BODY_LIMIT,
            stamp_time: true,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Read `PNLCARD_*` variables from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("PNLCARD_HOST") {
            config.host = parse("PNLCARD_HOST", &v)?;
        }
        if let Some(v) = lookup("PNLCARD_PORT") {
            config.port = parse("PNLCARD_PORT", &v)?;
        }
        if let Some(v) = lookup("PNLCARD_FONT_PATH") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                config.font_path = Some(PathBuf::from(trimmed));
            }
        }
        if let Some(v) = lookup("PNLCARD_BODY_LIMIT") {
            config.body_limit = parse("PNLCARD_BODY_LIMIT", &v)?;
        }
        if let Some(v) = lookup("PNLCARD_STAMP_TIME") {
            config.stamp_time = parse_bool("PNLCARD_STAMP_TIME", &v)?;
        }
        if let Some(v) = lookup("PNLCARD_LOG_JSON") {
            config.log_json = parse_bool("PNLCARD_LOG_JSON", &v)?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
