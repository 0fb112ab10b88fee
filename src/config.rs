//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CARDIORISK_ARTIFACTS_DIR` | `models/desktop` or `models/web` |
//! | `CARDIORISK_USER_DB` | `users.json` |
//! | `CARDIORISK_BIND_ADDR` | `127.0.0.1:5000` |
//! | `CARDIORISK_LOG_MODE` | `auto` |
//! | `CARDIORISK_LOG_FILE` | `cardiorisk.log` |
//! | `CARDIORISK_VERIFY_FINGERPRINTS` | `true` |
//!
//! `RUST_LOG` is read by the log filter directly.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const ARTIFACTS_DIR_ENV: &str = "CARDIORISK_ARTIFACTS_DIR";
pub const USER_DB_ENV: &str = "CARDIORISK_USER_DB";
pub const BIND_ADDR_ENV: &str = "CARDIORISK_BIND_ADDR";
pub const LOG_MODE_ENV: &str = "CARDIORISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIORISK_LOG_FILE";
pub const VERIFY_FINGERPRINTS_ENV: &str = "CARDIORISK_VERIFY_FINGERPRINTS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {var}: '{value}' ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Which front-end is starting; selects defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Desktop,
    Web,
}

impl Variant {
    fn default_artifacts_dir(self) -> &'static str {
        match self {
            Self::Desktop => "models/desktop",
            Self::Web => "models/web",
        }
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to an interactive terminal, stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            _ => Err("expected auto, file or stdout".into()),
        }
    }
}

/// Settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub artifacts_dir: PathBuf,
    pub user_db: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub verify_fingerprints: bool,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_env(variant: Variant) -> Result<Self, ConfigError> {
        Self::from_lookup(variant, |name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_lookup<F>(variant: Variant, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path_or = |var: &str, default: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from(default), PathBuf::from)
        };

        let bind_raw = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|e: std::net::AddrParseError| ConfigError {
            var: BIND_ADDR_ENV,
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let log_mode = match lookup(LOG_MODE_ENV) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError {
                var: LOG_MODE_ENV,
                value: raw.clone(),
                reason,
            })?,
            None => LogMode::Auto,
        };

        let verify_fingerprints = match lookup(VERIFY_FINGERPRINTS_ENV) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError {
                var: VERIFY_FINGERPRINTS_ENV,
                value: raw.clone(),
                reason: "expected true or false".into(),
            })?,
            None => true,
        };

        Ok(Self {
            artifacts_dir: path_or(ARTIFACTS_DIR_ENV, variant.default_artifacts_dir()),
            user_db: path_or(USER_DB_ENV, "users.json"),
            bind_addr,
            log_mode,
            log_file: path_or(LOG_FILE_ENV, "cardiorisk.log"),
            verify_fingerprints,
        })
    }
}

/// Accepts `1/true/yes` and `0/false/no` in any case.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
