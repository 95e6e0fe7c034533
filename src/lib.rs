pub mod auth;
pub mod config;
pub mod error;
pub mod home;
pub mod upstream;
pub mod view;

use std::sync::Arc;
use actix_web::{web, HttpResponse};

pub use crate::error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::Settings;

pub use crate::upstream::{AuthApi, UpstreamClient, UpstreamResponse};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth_api: Arc<dyn AuthApi>,
}

impl AppState {
    pub fn new(config: Settings) -> Result<Self> {
        let client = UpstreamClient::new(&config.upstream)?;

        Ok(Self::with_auth_api(config, Arc::new(client)))
    }

    pub fn with_auth_api(config: Settings, auth_api: Arc<dyn AuthApi>) -> Self {
        Self {
            config: Arc::new(config),
            auth_api,
        }
    }
}

/// Register every route the server answers
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let form_config = web::FormConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into());

    cfg.app_data(form_config)
        .route("/health", web::get().to(health_check))
        .route(auth::HOME_ROUTE, web::get().to(home::home))
        .route("/login", web::post().to(auth::login))
        .route("/signup", web::post().to(auth::signup))
        .route("/signout", web::post().to(auth::signout));
}
