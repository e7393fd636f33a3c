//! Celula-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use celula_api::{AppState, auth_middleware, router as api_router};
use celula_common::{Config, LocalStorage, config::StorageConfig};
use celula_core::services::upload::MAX_UPLOAD_SIZE;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Room for multipart framing on top of the file itself.
const BODY_LIMIT: usize = MAX_UPLOAD_SIZE + 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Upload directory, image assets and the web client files.
fn static_routes(storage: &StorageConfig) -> Router {
    let frontend = |file: &str| ServeFile::new(storage.frontend_dir.join(file));

    Router::new()
        .nest_service(&storage.upload_url, ServeDir::new(&storage.upload_dir))
        .nest_service("/imagens", ServeDir::new(&storage.assets_dir))
        .route_service("/", frontend("client.html"))
        .route_service("/admin", frontend("admin.html"))
        .route_service("/manifest.json", frontend("manifest.json"))
        .route_service("/sw.js", frontend("sw.js"))
        .route_service("/app_icon.png", frontend("app_icon.png"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "celula=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting celula-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = celula_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    celula_db::migrate(&db).await?;
    info!("Migrations completed");

    let storage = Arc::new(LocalStorage::new(
        config.storage.upload_dir.clone(),
        config.storage.upload_url.clone(),
    ));
    let state = AppState::build(Arc::new(db), storage);

    // Build router
    let api = api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api)
        .merge(static_routes(&config.storage))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
