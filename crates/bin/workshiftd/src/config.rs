//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `workshift.toml` in the working directory, or the file named by
//! `WORKSHIFT_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono_tz::Tz;
use serde::Deserialize;

use workshift_domain::entity::slugify;
use workshift_domain::error::ValidationError;
use workshift_domain::schedule::ScheduleSettings;

const DEFAULT_PATH: &str = "workshift.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Host-wide settings shared by every schedule.
    pub host: HostConfig,
    /// Initial raw values of workday signals, keyed by signal id.
    pub signals: BTreeMap<String, String>,
    /// One entry per rotating schedule.
    pub schedules: Vec<ScheduleSettings>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// IANA zone used by schedules that do not name their own.
    pub time_zone: String,
    /// Language of the default shift label.
    pub language: String,
    /// Directory holding `<language>.json` translation files.
    pub translations_dir: PathBuf,
}

impl Config {
    /// Load configuration from `workshift.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if any
    /// schedule fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WORKSHIFT_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("WORKSHIFT_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("WORKSHIFT_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("WORKSHIFT_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("WORKSHIFT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("WORKSHIFT_TIME_ZONE") {
            self.host.time_zone = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.host.time_zone.parse::<Tz>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unknown host time zone {:?}",
                self.host.time_zone
            )));
        }

        let mut names = BTreeSet::new();
        for settings in &self.schedules {
            settings.validate().map_err(|source| ConfigError::Schedule {
                name: settings.name.clone(),
                source,
            })?;
            // entity ids are built from the slug
            if !names.insert(slugify(&settings.name)) {
                return Err(ConfigError::Schedule {
                    name: settings.name.clone(),
                    source: ValidationError::DuplicateName(settings.name.clone()),
                });
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Parsed host time zone; UTC if the value was never validated.
    #[must_use]
    pub fn time_zone(&self) -> Tz {
        self.host.time_zone.parse().unwrap_or(Tz::UTC)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "workshiftd=info,workshift_app=info,workshift_domain=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            language: "en".to_string(),
            translations_dir: PathBuf::from("translations"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// A schedule entry was rejected.
    #[error("invalid schedule {name:?}")]
    Schedule {
        name: String,
        #[source]
        source: ValidationError,
    },
}
