use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use record_server::config::{parse_path, AppConfig, CliConfig, FileConfig};
use record_server::record_store::{SqliteRecordStore, TransactionMode, DEFAULT_BUSY_TIMEOUT_MS};
use record_server::{run_server, RequestsLoggingLevel};

#[derive(Parser, Debug)]
#[clap(version, about = "CRUD HTTP service for data records backed by SQLite")]
struct CliArgs {
    /// Path to the SQLite database file holding the records.
    #[clap(long, env = "DATABASE_PATH", default_value = "records.db", value_parser = parse_path)]
    pub database_path: PathBuf,

    /// The address to listen on.
    #[clap(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Shared secret expected in the X-API-Key header of every /data request.
    /// A random key is generated and printed when not set.
    #[clap(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// How long a request waits on a locked database before failing, in milliseconds.
    #[clap(long, env = "BUSY_TIMEOUT_MS", default_value_t = DEFAULT_BUSY_TIMEOUT_MS)]
    pub busy_timeout_ms: u64,

    /// Locking mode of write transactions.
    #[clap(long, env = "TRANSACTION_MODE", default_value = "exclusive")]
    pub transaction_mode: TransactionMode,

    /// The level of logging to perform on each request.
    #[clap(long, env = "REQUESTS_LOGGING_LEVEL", default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Optional TOML file whose values override flags and environment.
    #[clap(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            database_path: self.database_path.clone(),
            host: self.host.clone(),
            port: self.port,
            api_key: self.api_key.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            transaction_mode: self.transaction_mode,
            logging_level: self.logging_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    info!(
        "Starting record-server {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    info!("Resolved configuration: {:?}", app_config);

    if app_config.api_key_generated {
        warn!("No API key configured, generated a random one for this run");
        println!("Generated API key: {}", app_config.api_key);
    }

    info!(
        "Opening records database at {:?}...",
        app_config.database_path
    );
    let database_path = app_config.database_path.clone();
    let store_settings = app_config.store_settings();
    let record_store = tokio::task::spawn_blocking(move || {
        SqliteRecordStore::new(&database_path, store_settings)
    })
    .await
    .context("Records database initialization did not complete")?
    .context("Failed to initialize records database")?;
    let record_store = Arc::new(record_store);

    run_server(app_config.server_config(), record_store).await
}
