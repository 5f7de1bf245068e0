//! Gateway configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`), with defaults suitable for local play.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::domain::MoveValidation;
use crate::service::SessionPolicy;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Per-connection outbound queue length; notices beyond it are dropped.
    pub outbox_capacity: usize,

    /// When `false`, joins to a room with both seats taken get `full`.
    pub spectators_enabled: bool,

    /// How strictly client-proposed boards are checked.
    pub move_validation: MoveValidation,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            outbox_capacity: 64,
            spectators_enabled: true,
            move_validation: MoveValidation::Strict,
            log_format: LogFormat::Text,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR`, `MOVE_VALIDATION` or `LOG_FORMAT`
    /// is set but cannot be parsed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };
        let move_validation = match std::env::var("MOVE_VALIDATION") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.move_validation,
        };
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.log_format,
        };

        Ok(Self {
            listen_addr,
            outbox_capacity: parse_env("OUTBOX_CAPACITY", defaults.outbox_capacity),
            spectators_enabled: parse_env_bool("SPECTATORS_ENABLED", defaults.spectators_enabled),
            move_validation,
            log_format,
        })
    }

    /// Session rules derived from this configuration.
    #[must_use]
    pub const fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            spectators_enabled: self.spectators_enabled,
            move_validation: self.move_validation,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
