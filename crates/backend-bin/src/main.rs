use anyhow::Context;
use authgate_backend_lib::{
    config::{Settings, DEFAULT_CONFIG_FILE},
    login_router,
    storage::{ConnectionManager, MongoDriver},
    AppState,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Email/password login server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Arc::new(ConnectionManager::new(MongoDriver));
    store
        .connect(&settings.mongo_url, &settings.mongo_database)
        .await
        .context("connecting to the document store")?;

    let state = Arc::new(AppState::compose(&settings, store.clone()));
    let app = login_router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(error) = store.disconnect().await {
        error!(%error, "failed to disconnect from the document store");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
