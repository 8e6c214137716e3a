//! Configuration for the IRC endpoint
//!
//! Supports both command-line arguments and a TOML configuration file.
//! CLI arguments take precedence over config file values.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "minimal-irc")]
#[command(version)]
#[command(about = "A minimal IRC endpoint", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 0.0.0.0:6667)
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Seconds of client silence before the session is closed (0 = never)
    #[arg(long)]
    pub read_timeout: Option<u64>,

    /// Seconds allowed to flush one reply (0 = no limit)
    #[arg(long)]
    pub write_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            read_timeout_secs: default_read_timeout(),
            write_timeout_secs: default_write_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:6667".to_string()
}

fn default_read_timeout() -> u64 {
    600
}

fn default_write_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-session I/O limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timeouts {
    /// Longest wait for the next inbound bytes
    pub read: Option<Duration>,
    /// Longest wait to flush one reply
    pub write: Option<Duration>,
}

impl Timeouts {
    /// Build from seconds, where 0 disables the limit
    pub fn from_secs(read: u64, write: u64) -> Self {
        let limit = |secs| (secs > 0).then(|| Duration::from_secs(secs));
        Self {
            read: limit(read),
            write: limit(write),
        }
    }
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub timeouts: Timeouts,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process arguments and optional TOML file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_cli(CliArgs::parse())
    }

    /// Resolve already-parsed CLI arguments against the TOML file they name.
    pub fn from_cli(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = match cli.config {
            Some(ref config_path) => {
                let contents = std::fs::read_to_string(config_path)
                    .map_err(|source| ConfigError::FileRead {
                        path: config_path.clone(),
                        source,
                    })?;
                toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
                    path: config_path.clone(),
                    source,
                })?
            }
            None => TomlConfig::default(),
        };

        Ok(Self::merge(cli, toml_config))
    }

    /// Merge CLI args with TOML config (CLI takes precedence)
    fn merge(cli: CliArgs, file: TomlConfig) -> Self {
        Config {
            listen: cli.listen.unwrap_or(file.server.listen),
            timeouts: Timeouts::from_secs(
                cli.read_timeout.unwrap_or(file.server.read_timeout_secs),
                cli.write_timeout.unwrap_or(file.server.write_timeout_secs),
            ),
            log_level: cli.log_level.unwrap_or(file.logging.level),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
