//! Armoire server binary.

use anyhow::{Context, Result};
use armoire_core::config::AppConfig;
use armoire_server::{AppState, create_router};
use armoire_sync::SyncService;
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Armoire - virtual-world asset manager
#[derive(Parser, Debug)]
#[command(name = "armoired")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "ARMOIRE_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: AppConfig = Figment::new()
        .merge(Toml::file(&args.config))
        .merge(Env::prefixed("ARMOIRE_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let storage = armoire_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage backend")?;
    storage
        .health_check()
        .await
        .context("storage backend is not reachable")?;

    let db = armoire_db::from_config(&config.database)
        .await
        .context("failed to connect to emulator database")?;

    let sync = SyncService::new(storage, db);
    let state = AppState::new(config, sync);

    let bind = state.config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "armoired listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")?;

    Ok(())
}
