use actix_web::{web, App, HttpServer};
use actix_cors::Cors;
use syfit_web::{configure_routes, AppState, Settings, AppError};
use dotenv::dotenv;
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn cors(settings: &Settings) -> Cors {
    if !settings.cors.enabled {
        // CORS disabled - same-origin only
        return Cors::default();
    }

    settings
        .cors
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec!["Content-Type"])
        .supports_credentials()
        .max_age(settings.cors.max_age as usize)
}

#[actix_web::main]
async fn main() -> syfit_web::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    if config.upstream.api_key.is_empty() {
        tracing::warn!("API_KEY is not set, upstream requests will carry an empty api_key header");
    }

    info!("Forwarding to upstream at {}", config.upstream.base_url);
    info!("Starting server at {}:{}", config.server.host, config.server.port);

    let state = web::Data::new(AppState::new(config.clone())?);

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    let workers = config.server.workers as usize;

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&config))
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
