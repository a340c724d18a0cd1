//! Helpdesk Backend Server
//! Mission: Serve the helpdesk API

use anyhow::{Context, Result};
use dotenv::dotenv;
use helpdesk_backend::{
    api::{create_router, AppState},
    auth::JwtHandler,
    config::Config,
    store::Database,
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    info!("🎫 Helpdesk backend starting");

    let config = Config::from_env()?;

    let db = Arc::new(Database::new(&config.db_path)?);
    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()));

    info!("📊 Database: {}", config.db_path);

    let state = AppState { db, jwt };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn load_env() {
    // Standard dotenv search (cwd + parents), then the crate directory so
    // running with --manifest-path from elsewhere still finds .env.
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpdesk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
