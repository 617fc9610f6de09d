// src/main.rs

use std::env;
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod auth;
mod models;
mod notify;
mod persist;
mod query;
mod routes;
mod store;

use auth::StaffDirectory;
use notify::{LogTransport, NotificationQueue, NotificationTransport, WebhookTransport};
use persist::{JsonFileStore, SnapshotStore, DEFAULT_DATA_FILE};
use store::ComplaintStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ComplaintStore>,
    pub directory: Arc<StaffDirectory>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Notification dispatch: webhook when configured, local simulation otherwise
    let transport: Arc<dyn NotificationTransport> = match env::var("NOTIFY_WEBHOOK_URL") {
        Ok(url) => Arc::new(WebhookTransport::new(url)),
        Err(_) => Arc::new(LogTransport),
    };
    let (queue, rx) = NotificationQueue::channel();
    notify::spawn_dispatcher(rx, transport);

    // Reload the complaint snapshot from the fixed storage file
    let data_file = env::var("DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.into());
    let persist: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(&data_file));
    let store = Arc::new(ComplaintStore::open(persist, queue).await?);

    let state = AppState {
        store,
        directory: Arc::new(StaffDirectory::seeded()),
    };

    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Root API router
    let api = Router::new()
        // health
        .route("/health", get(routes::health::health))
        // complaints
        .route(
            "/api/v1/complaints",
            post(routes::complaints::create_complaint).get(routes::complaints::list_complaints),
        )
        .route(
            "/api/v1/complaints/:id",
            get(routes::complaints::get_complaint),
        )
        .route(
            "/api/v1/complaints/:id/status",
            patch(routes::complaints::update_status),
        )
        .route(
            "/api/v1/complaints/:id/response",
            post(routes::complaints::add_response),
        )
        .route(
            "/api/v1/complaints/:id/assign",
            post(routes::complaints::assign),
        )
        // reference data
        .route(
            "/api/v1/departments",
            get(routes::complaints::list_departments),
        )
        // dashboard
        .route("/api/v1/stats", get(routes::stats::get_stats))
        // auth
        .route("/api/v1/auth/login", post(routes::auth::login))
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Port (axum 0.7 style)
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let api_base = format!("http://127.0.0.1:{port}");
    println!("✅ PORT={}, using {} (data file: {})", port, addr, data_file);
    println!("🚀 API listening on {api_base}");

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
