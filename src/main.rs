mod api;
mod config;
mod models;
mod services;
mod sources;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use services::MemStorage;
use sources::jupiter::JupiterProvider;
use sources::raydium::RaydiumProvider;

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,solana_dex_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🚀 Solana DEX API starting...\n");

    let config = Config::load()?;
    tracing::info!("✓ Configuration loaded");

    let raydium = Arc::new(RaydiumProvider::new(
        &config.upstream.raydium_url,
        config.upstream.timeout_secs,
        config.upstream.fetch_limit,
    ));
    let jupiter = Arc::new(JupiterProvider::new(
        &config.upstream.jupiter_url,
        config.upstream.timeout_secs,
    ));

    // One storage instance for the process, injected into the handlers.
    let storage = Arc::new(MemStorage::new());

    let state = Arc::new(AppState {
        storage,
        pools: raydium.clone(),
        tokens: raydium,
        quotes: jupiter,
    });

    let app = create_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("\n✓ Server ready on http://{}\n", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
