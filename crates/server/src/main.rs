//! Reaper server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use reaper_clients::{ActionCatalog, HttpActionCatalog, HttpRecordStore, RecordStore};
use reaper_core::AppConfig;
use reaper_deleter::Deleter;
use reaper_server::{create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Reaper - cascading deletion service for media items and caches
#[derive(Parser, Debug)]
#[command(name = "reaperd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "REAPER_CONFIG",
        default_value = "config/reaper.toml"
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

    tracing::info!("Reaper v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("REAPER_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    // Initialize the blob store, one backend per configured root
    let storage = reaper_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage")?;
    tracing::info!(
        roots = ?storage.root_names().collect::<Vec<_>>(),
        "Storage roots initialized"
    );

    // Collaborator clients
    let records = Arc::new(
        HttpRecordStore::new(
            &config.upstream.records_url,
            config.upstream.bearer_token.clone(),
            config.upstream.request_timeout(),
        )
        .context("failed to create record store client")?,
    );
    let actions = Arc::new(
        HttpActionCatalog::new(
            &config.upstream.actions_url,
            config.upstream.bearer_token.clone(),
            config.upstream.request_timeout(),
        )
        .context("failed to create action catalog client")?,
    );

    // Probe both collaborators once at startup. Failures are logged, not
    // fatal: the collaborators may come up after us.
    match records.ping().await {
        Ok(()) => tracing::info!(url = %config.upstream.records_url, "record store reachable"),
        Err(e) => tracing::error!(url = %config.upstream.records_url, error = %e, "cannot ping record store"),
    }
    match actions.ping().await {
        Ok(()) => tracing::info!(url = %config.upstream.actions_url, "action catalog reachable"),
        Err(e) => tracing::error!(url = %config.upstream.actions_url, error = %e, "cannot ping action catalog"),
    }

    let deleter = Arc::new(Deleter::new(records, actions, storage));
    let state = AppState::new(config.clone(), deleter);
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
