//! # LifeSync API Server
//!
//! Family finance and household organizer backend.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/lifesync \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p lifesync-api
//! ```
//!
//! Set `LOG_FORMAT=json` for structured log output.

use lifesync_api::{
    app::{build_router, AppState},
    config::Config,
};
use lifesync_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lifesync_api=debug,lifesync_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env has to be loaded before the log filter is read
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("LifeSync API v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool_with_retry(config.pool_config()).await?;

    migrations::run_migrations(&db).await?;
    let status = migrations::get_migration_status(&db).await?;
    tracing::info!(
        applied = status.applied_migrations,
        latest = ?status.latest_version,
        "Database migrations up to date"
    );

    let address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}
