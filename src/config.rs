//! Runtime configuration.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. CLI flags and their environment variables (`TASKTRACK_*`,
//!    `DATABASE_URL`)
//! 2. The TOML file named by `--config`
//! 3. Built-in defaults

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 5000);

/// Default maximum number of pooled database connections.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Default log filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// Origins of the bundled frontend's dev servers.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:8080", "http://localhost:3000"];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Command-line arguments.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tasktrack")]
#[command(version, about = "Kanban task tracker REST service", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "TASKTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "TASKTRACK_BIND")]
    pub bind: Option<SocketAddr>,

    /// `PostgreSQL` connection URL. Without one the in-memory store is used.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections.
    #[arg(long, env = "TASKTRACK_POOL_SIZE")]
    pub pool_size: Option<u32>,

    /// Allowed CORS origin. Repeat or comma-separate for several.
    #[arg(long = "cors-origin", env = "TASKTRACK_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Seed the default users at startup.
    #[arg(long, env = "TASKTRACK_SEED_USERS")]
    pub seed_users: Option<bool>,

    /// Log filter directive, e.g. `debug,tower_http=info`.
    #[arg(long, env = "TASKTRACK_LOG")]
    pub log_filter: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, env = "TASKTRACK_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

/// Contents of the optional TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Address to listen on.
    pub bind: Option<SocketAddr>,
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    /// Allowed CORS origins.
    pub cors_origins: Option<Vec<String>>,
    /// Seed the default users at startup.
    pub seed_users: Option<bool>,
    /// Log filter directive.
    pub log_filter: Option<String>,
    /// Log output format.
    pub log_format: Option<LogFormat>,
}

impl FileConfig {
    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration file is not valid.
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: Box<toml::de::Error>,
    },
    /// A resolved value is out of range.
    #[error("invalid setting {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Address to listen on.
    pub bind: SocketAddr,
    /// `PostgreSQL` connection URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Seed the default users at startup.
    pub seed_users: bool,
    /// Log filter directive.
    pub log_filter: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self::merge(Cli::default(), FileConfig::default())
    }
}

impl Settings {
    /// Parses the command line and resolves settings from every layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration file cannot be loaded
    /// or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(Cli::parse())
    }

    /// Resolves settings from already-parsed arguments, loading the file
    /// they name, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration file cannot be loaded
    /// or a value is out of range.
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let settings = Self::merge(cli, file);
        settings.validate()?;
        Ok(settings)
    }

    /// Layers CLI values over file values over defaults.
    #[must_use]
    pub fn merge(cli: Cli, file: FileConfig) -> Self {
        Self {
            bind: cli.bind.or(file.bind).unwrap_or(DEFAULT_BIND),
            database_url: cli
                .database_url
                .or(file.database_url)
                .filter(|url| !url.trim().is_empty()),
            pool_size: cli
                .pool_size
                .or(file.pool_size)
                .unwrap_or(DEFAULT_POOL_SIZE),
            cors_origins: cli.cors_origins.or(file.cors_origins).unwrap_or_else(|| {
                DEFAULT_CORS_ORIGINS.iter().map(|&o| o.to_owned()).collect()
            }),
            seed_users: cli.seed_users.or(file.seed_users).unwrap_or(true),
            log_filter: cli
                .log_filter
                .or(file.log_filter)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
            log_format: cli.log_format.or(file.log_format).unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "pool_size",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
