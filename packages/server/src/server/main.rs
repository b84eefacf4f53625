// Main entry point for the document approval API server

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use approval_core::kernel::PostgresDocumentStore;
use approval_core::server::{build_app, AppState};
use approval_core::Config;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "server", about = "Document approval API server")]
struct Args {
    /// Env file to load before reading the environment (defaults to ./.env)
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,approval_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let config = match &args.env_file {
        Some(path) => Config::from_env_file(path),
        None => Config::from_env(),
    }
    .context("Failed to load configuration")?;
    tracing::info!(
        app = %config.app.name,
        stage = %config.app.stage,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options()?)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let store = Arc::new(PostgresDocumentStore::new(pool));
    let app = build_app(AppState::new(store, config.request_timeout));

    // Start server
    tracing::info!("Starting {} on {}", config.app.name, config.app.url);
    tracing::info!("Health check: http://{}/health", config.app.url);

    let listener = tokio::net::TcpListener::bind(&config.app.url)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
