//! Birthday Wishes Backend
//!
//! REST backend for birthday pages and wishes with SQLite persistence,
//! an external image host and an SMTP relay for share links.

mod api;
mod config;
mod db;
mod errors;
mod mail;
mod models;
mod share;
mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use mail::{MailRelay, SmtpRelay, UnconfiguredMailRelay};
use upload::{CloudinaryHost, ImageHost, UnconfiguredImageHost};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub images: Arc<dyn ImageHost>,
    pub mailer: Arc<dyn MailRelay>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Birthday Wishes Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Share links point at: {}", config.app_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    let images: Arc<dyn ImageHost> = match CloudinaryHost::from_config(&config.images)? {
        Some(host) => Arc::new(host),
        None => {
            tracing::warn!(
                "No image host configured (CLOUDINARY_CLOUD_NAME, CLOUDINARY_UPLOAD_PRESET). Image uploads will fail!"
            );
            Arc::new(UnconfiguredImageHost)
        }
    };

    let mailer: Arc<dyn MailRelay> = match SmtpRelay::from_config(&config.mail)? {
        Some(relay) => Arc::new(relay),
        None => {
            tracing::warn!("No mail sender configured (EMAIL_USER). Sharing is disabled!");
            Arc::new(UnconfiguredMailRelay)
        }
    };

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let bind_addr = config.bind_addr;
    let state = AppState {
        repo,
        images,
        mailer,
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    let api_routes = Router::new()
        // Birthdays
        .route(
            "/birthday",
            get(api::list_birthdays).post(api::create_birthday),
        )
        .route("/birthday/{id}", get(api::get_birthday))
        // Wishes
        .route("/wish", post(api::create_wish))
        .route("/wish/{page_id}", get(api::list_wishes))
        // Share
        .route("/share", post(api::create_share));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
