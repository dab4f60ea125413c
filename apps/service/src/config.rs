use std::{env, fmt, fs, path};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::database::{TableName, TableNameError};
use crate::monitoring::validation::IntervalBounds;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read configuration file {path}: {source}")]
    ReadFailed { path: String, source: std::io::Error },
    #[error("Failed to parse configuration file {path}: {source}")]
    ParseFailed { path: String, source: toml::de::Error },
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Connection parameters for the results database
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub tablename: String,
}

/// Tunables for the polling loop
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Per-request timeout; 0 leaves requests unbounded
    pub request_timeout_seconds: u64,
    pub min_interval_seconds: u64,
    pub max_interval_seconds: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self { request_timeout_seconds: 30, min_interval_seconds: 5, max_interval_seconds: 300 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub monitor: MonitorSettings,
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().is_none() {
        path.set_extension("toml");
    }
    path
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Configuration:")?;
        write_title_1(f, "Database")?;
        write_1(f, "Host", &self.database.host)?;
        write_1(f, "Port", &self.database.port)?;
        write_1(f, "User", &self.database.user)?;
        write_1(f, "Password", &"********")?;
        write_1(f, "Database", &self.database.dbname)?;
        write_1(f, "Table", &self.database.tablename)?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Request Timeout (s)", &self.monitor.request_timeout_seconds)?;
        write_1(f, "Min Interval (s)", &self.monitor.min_interval_seconds)?;
        write_1(f, "Max Interval (s)", &self.monitor.max_interval_seconds)?;

        Ok(())
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, Error> {
    lookup(name).filter(|value| !value.trim().is_empty()).ok_or(Error::Missing(name))
}

impl Config {
    /// Load configuration from `path` if it exists, otherwise from the
    /// `DB_*` environment variables (a `.env` file is honoured).
    ///
    /// ```rust,ignore
    /// let cfg = config::Config::load("config.toml")?;
    /// println!("{}", cfg);
    /// ```
    pub fn load(path: impl AsRef<path::Path>) -> Result<Self, Error> {
        let config_path = normalize_toml_path(path.as_ref());

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            info!(
                "Config file not found at {}. Trying environment variables...",
                config_path.display()
            );
            let _ = dotenvy::dotenv();
            Self::from_env_with(|name| env::var(name).ok())
        }
    }

    /// Parse and validate a TOML configuration file
    pub fn from_file(path: &path::Path) -> Result<Self, Error> {
        let raw_string = fs::read_to_string(path)
            .map_err(|source| Error::ReadFailed { path: path.display().to_string(), source })?;
        let config: Self = toml::from_str(&raw_string)
            .map_err(|source| Error::ParseFailed { path: path.display().to_string(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from environment-style lookups
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let port = require(&lookup, "DB_PORT")?;
        let port = port.trim().parse::<u16>().map_err(|e| Error::Invalid {
            field: "DB_PORT",
            reason: format!("'{port}' is not a valid port: {e}"),
        })?;

        let mut monitor = MonitorSettings::default();
        if let Some(timeout) = lookup("WEBMONITOR_REQUEST_TIMEOUT") {
            monitor.request_timeout_seconds = timeout.trim().parse().map_err(|e| {
                Error::Invalid {
                    field: "WEBMONITOR_REQUEST_TIMEOUT",
                    reason: format!("'{timeout}' is not a number of seconds: {e}"),
                }
            })?;
        }

        let config = Self {
            database: DatabaseConfig {
                host: require(&lookup, "DB_HOST")?,
                port,
                user: require(&lookup, "DB_USER")?,
                password: require(&lookup, "DB_PASSWORD")?,
                dbname: require(&lookup, "DB_NAME")?,
                tablename: require(&lookup, "DB_TABLENAME")?,
            },
            monitor,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        let db = &self.database;
        let fields = [
            ("host", &db.host),
            ("user", &db.user),
            ("password", &db.password),
            ("dbname", &db.dbname),
            ("tablename", &db.tablename),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Missing(name));
            }
        }

        TableName::new(&db.tablename)
            .map_err(|e| Error::Invalid { field: "tablename", reason: e.to_string() })?;

        if self.monitor.min_interval_seconds == 0 {
            return Err(Error::Invalid {
                field: "monitor.min_interval_seconds",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.monitor.min_interval_seconds > self.monitor.max_interval_seconds {
            return Err(Error::Invalid {
                field: "monitor.min_interval_seconds",
                reason: format!(
                    "{} is greater than max_interval_seconds {}",
                    self.monitor.min_interval_seconds, self.monitor.max_interval_seconds
                ),
            });
        }

        Ok(())
    }

    /// Validated table name for the results table
    pub fn table_name(&self) -> Result<TableName, TableNameError> {
        TableName::new(&self.database.tablename)
    }

    pub fn interval_bounds(&self) -> IntervalBounds {
        IntervalBounds::new(self.monitor.min_interval_seconds, self.monitor.max_interval_seconds)
    }
}
