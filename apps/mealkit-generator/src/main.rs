use anyhow::{Context, Result};
use clap::Parser;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use generation_service::{Config, GenerationModule};
use sea_orm::{ConnectOptions, Database};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Periodically fills the meal-kit database with synthetic records
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// YAML configuration file; `MEALKIT_*` environment variables override it
    #[arg(short, long, default_value = "config/generator.yaml")]
    config: PathBuf,
}

#[derive(Debug, Deserialize, Serialize)]
struct AppConfig {
    database_url: String,
    log_filter: String,
    #[serde(default, skip_serializing)]
    generation: Option<Config>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://mealkit.db?mode=rwc".to_string(),
            log_filter: "info".to_string(),
            generation: None,
        }
    }
}

fn load_config(path: &PathBuf) -> Result<AppConfig> {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed("MEALKIT_").split("__"))
        .extract()
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    fmt().with_env_filter(filter).with_target(true).init();

    info!(config = %args.config.display(), "Starting mealkit generator");

    let mut options = ConnectOptions::new(config.database_url.as_str());
    options.sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .context("failed to connect to database")?;
    GenerationModule::migrate(&conn).await?;

    let module = Arc::new(GenerationModule::with_database(
        config.generation.unwrap_or_default(),
        conn,
    )?);

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    module.serve(cancel).await?;
    info!("Mealkit generator stopped");
    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    cancel.cancel();
}
