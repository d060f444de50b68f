//! HTTP server assembly and shared state.

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::complaints;
use super::profile;
use super::tasks;
use super::types::HealthResponse;
use crate::config::Config;
use crate::store::{SqliteStore, Store};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Entity store (sqlite in production, in-memory in tests)
    pub store: Arc<dyn Store>,
}

/// Start the HTTP server with a SQLite-backed store.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(&config.database_path).await?);
    tracing::info!(
        "Entity store ready at {}",
        config.database_path.display()
    );
    serve_with_store(config, store).await
}

/// Start the HTTP server with an explicit store backend.
pub async fn serve_with_store(config: Config, store: Arc<dyn Store>) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
    });

    let app = router(Arc::clone(&state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the full router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register));

    let protected_routes = Router::new()
        .route("/tasks/list", get(tasks::list_tasks))
        .route("/tasks/create", post(tasks::create_task))
        .route("/tasks/:id", get(tasks::get_task))
        .route("/tasks/:id/complaints", get(tasks::task_complaints))
        .route("/api/check_answer", get(tasks::check_answer))
        .route("/api/tasks_search", get(tasks::tasks_search))
        .route("/api/tasks/suggest", get(tasks::suggest_next))
        // Complaint workflow endpoints
        .route("/complaints/create/:task_id", post(complaints::create_complaint))
        .route("/complaints/list", get(complaints::list_pending))
        .route(
            "/complaints/:id",
            get(complaints::get_complaint).post(complaints::adjudicate),
        )
        // Profile endpoints
        .route(
            "/profile/settings",
            get(profile::get_settings).post(profile::update_settings),
        )
        .route("/profile/history", get(profile::history))
        .route("/profile/:id", get(profile::profile))
        .route("/profile/:id/created_tasks", get(profile::created_tasks))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for SIGTERM/SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dev_mode: state.config.dev_mode,
    })
}
