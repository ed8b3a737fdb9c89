mod models;
mod handlers;
mod routes;
mod docs;
mod config;
mod events;
mod services;
mod state;
mod utils;
mod websocket;

use config::Config;
use routes::create_app_routes;
use std::panic;
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub use state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Load configuration first so its log level can seed the tracing filter
    let loaded = Config::load();
    let config = loaded.as_ref().map(Clone::clone).unwrap_or_default();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.default_log_filter().into()))
        .init();

    info!("Starting worker...");

    match loaded {
        Ok(_) => info!("✅ Configuration loaded successfully"),
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            warn!("Using default configuration");
        }
    }
    if config.is_development() {
        info!("Running in development mode: {:?}", config);
    }

    let app_state = Arc::new(AppState::new(&config));
    let app_routes = create_app_routes(app_state);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 Worker running on http://{}", config.server_address());
    info!("📡 Editor channel at ws://{}/ws/editor", config.server_address());
    info!("📡 Task processor at ws://{}/ws/worker", config.server_address());
    info!("📡 Message bus at ws://{}/ws/bus", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
