//! noctura-store — storefront API
//!
//! HTTP JSON service backing the Noctura storefront:
//! - Read-only product catalog (list, detail, search)
//! - Per-user persisted cart with merge-by-variant reconciliation
//! - Cart-to-order conversion with snapshot pricing
//! - Order history

use noctura_store::api;
use noctura_store::config::Config;
use noctura_store::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noctura_store=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting noctura-store (env: {})", config.environment);

    // Connect the pool and run migrations
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("noctura-store listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
