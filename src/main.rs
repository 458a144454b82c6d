use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use thar_booking::config::AppConfig;
use thar_booking::handlers;
use thar_booking::services::mailer::resend::ResendMailer;
use thar_booking::services::mailer::{Mailer, NoopMailer};
use thar_booking::state::AppState;
use thar_booking::store::{BookingStore, JsonFileStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store: Box<dyn BookingStore> = match config.store_backend.as_str() {
        "file" => {
            tracing::info!("using JSON file store (dir: {})", config.data_dir);
            Box::new(JsonFileStore::open(&config.data_dir)?)
        }
        _ => {
            tracing::info!("using SQLite store (path: {})", config.database_url);
            Box::new(SqliteStore::open(&config.database_url)?)
        }
    };

    let mailer: Box<dyn Mailer> = if config.resend_api_key.is_empty() {
        tracing::info!("RESEND_API_KEY not set, email notifications disabled");
        Box::new(NoopMailer)
    } else {
        tracing::info!("using Resend mail provider (from: {})", config.mail_from);
        Box::new(ResendMailer::new(
            config.resend_api_key.clone(),
            config.mail_from.clone(),
        ))
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        mailer,
    });

    let app = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/api/booking/create", post(handlers::booking::create_booking))
        .route("/api/booking/check", post(handlers::booking::check_booking))
        .route("/api/booking/all", get(handlers::booking::all_bookings))
        .route("/api/book-test-drive", post(handlers::test_drive::book_test_drive))
        .route("/api/test-drive/check", post(handlers::test_drive::check_test_drive))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/update-status/:booking_id",
            put(handlers::admin::update_status),
        )
        .route(
            "/api/admin/delete-booking/:booking_id",
            delete(handlers::admin::delete_booking),
        )
        .route("/api/admin/test-drives", get(handlers::admin::get_test_drives))
        .route(
            "/api/admin/test-drive/update-status/:booking_id",
            put(handlers::admin::update_test_drive_status),
        )
        .route(
            "/api/admin/test-drive/delete/:booking_id",
            delete(handlers::admin::delete_test_drive),
        )
        .route("/api/admin/statistics", get(handlers::admin::get_statistics))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
