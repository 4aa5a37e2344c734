mod file_config;

pub use file_config::FileConfig;

use crate::record_store::{StoreSettings, TransactionMode};
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use rand::Rng;
use rand_distr::Alphanumeric;
use std::path::PathBuf;
use std::time::Duration;

const GENERATED_API_KEY_LENGTH: usize = 32;

/// Settings coming from command line flags or their environment variables.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub busy_timeout_ms: u64,
    pub transaction_mode: TransactionMode,
    pub logging_level: RequestsLoggingLevel,
}

/// Fully resolved configuration, built once at startup and handed to the
/// store and the server.
#[derive(Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub api_key: String,
    /// True when no key was configured and `api_key` was generated for this run.
    pub api_key_generated: bool,
    pub busy_timeout_ms: u64,
    pub transaction_mode: TransactionMode,
    pub logging_level: RequestsLoggingLevel,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let database_path = match file.database_path {
            Some(path) => parse_path(&path)?,
            None => cli.database_path.clone(),
        };

        let host = file.host.unwrap_or_else(|| cli.host.clone());
        let port = file.port.unwrap_or(cli.port);
        if port == 0 {
            bail!("port must be greater than 0");
        }

        let (api_key, api_key_generated) = match file.api_key.or_else(|| cli.api_key.clone()) {
            Some(key) if key.trim().is_empty() => bail!("API key must not be empty"),
            Some(key) => (key, false),
            None => (generate_api_key(), true),
        };

        let busy_timeout_ms = file.busy_timeout_ms.unwrap_or(cli.busy_timeout_ms);
        if busy_timeout_ms == 0 {
            bail!("busy_timeout_ms must be greater than 0");
        }

        let transaction_mode = match file.transaction_mode {
            Some(s) => TransactionMode::from_str(&s, true)
                .map_err(|_| anyhow!("Invalid transaction_mode in config file: {}", s))?,
            None => cli.transaction_mode,
        };

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow!("Invalid logging_level in config file: {}", s))?,
            None => cli.logging_level.clone(),
        };

        Ok(Self {
            database_path,
            host,
            port,
            api_key,
            api_key_generated,
            busy_timeout_ms,
            transaction_mode,
            logging_level,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            api_key: self.api_key.clone(),
            requests_logging_level: self.logging_level.clone(),
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            transaction_mode: self.transaction_mode,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("api_key_generated", &self.api_key_generated)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .field("transaction_mode", &self.transaction_mode)
            .field("logging_level", &self.logging_level)
            .finish()
    }
}

/// Resolves `s` to an absolute path, relative paths are taken from the
/// working directory. The file does not need to exist yet.
pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn generate_api_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_API_KEY_LENGTH)
        .map(char::from)
        .collect()
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
