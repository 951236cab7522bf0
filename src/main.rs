use pmp_session_api::config;
use pmp_session_api::handlers;
use pmp_session_api::models::AppConfig;
use pmp_session_api::session::{MemorySessionStorage, SessionManagerState};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pmp_session_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let app_config = match config::load_config_with_fallback() {
        Ok(config) => {
            tracing::info!("✓ Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::warn!("⚠ {} Using default configuration.", e);
            AppConfig::default()
        }
    };

    let addr = match app_config.server.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid listen address: {}", e);
            return;
        }
    };

    // One session store for the whole process, shared through router state
    let sessions = SessionManagerState::new(
        Arc::new(MemorySessionStorage::new()),
        app_config.session.clone(),
    );

    let app = handlers::router(sessions)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("🚀 Starting PMP Session API server on {}", addr);
    tracing::info!(
        "🍪 Session cookie: '{}' (routes: /api/v1/session)",
        app_config.session.cookie_name
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
