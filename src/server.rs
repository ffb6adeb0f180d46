//! # Server Module
//!
//! HTTP server setup and route configuration for the backend.

use anyhow::{Context, Result};
use axum::{Router, middleware, routing::get};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::clock::MonotonicClock;
use crate::config::Config;
use crate::database::DatabaseConnection;
use crate::middleware::{JsonBodyLimit, cors, json_body::parse_json_body};
use crate::routes::health::ping;

/// Application state shared across all route handlers
#[derive(Clone, Default)]
pub struct AppState {
    /// Process-wide pool, present when `DATABASE_URL` is configured.
    /// No route acquires a connection from it yet.
    pub db: Option<Arc<DatabaseConnection>>,
    pub clock: Arc<MonotonicClock>,
}

impl AppState {
    pub fn new(db: Option<DatabaseConnection>) -> Self {
        Self {
            db: db.map(Arc::new),
            clock: Arc::new(MonotonicClock::new()),
        }
    }
}

/// Build the router with every route and middleware layer attached.
///
/// Layers run outermost first: tracing, CORS, then JSON body parsing, so
/// body rejections still carry CORS headers. Unknown paths fall through to
/// the framework's default 404.
pub fn create_router(state: AppState, json_body_limit: usize) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors::permissive())
                .layer(middleware::from_fn_with_state(
                    JsonBodyLimit(json_body_limit),
                    parse_json_body,
                )),
        )
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl+C or SIGTERM.
///
/// A malformed `DATABASE_URL` aborts startup; an absent one only disables
/// the pool. Building the pool never contacts the database.
pub async fn start(config: Config) -> Result<()> {
    let db = match &config.database {
        Some(settings) => Some(
            DatabaseConnection::from_url(&settings.url, settings.max_connections)
                .context("Failed to construct database pool")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL is not set, starting without a database pool");
            None
        }
    };

    let state = AppState::new(db);
    let app = create_router(state.clone(), config.server.json_body_limit);

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    serve(listener, app, shutdown_signal()).await?;

    if let Some(db) = &state.db {
        db.close();
        tracing::debug!("Database pool closed: {}", db.is_closed());
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    tracing::info!("Backend running on {}", local_addr.port());
    tracing::info!("📡 Listening on http://{}", local_addr);
    tracing::info!("🏥 Health check available at http://{}/api/ping", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
