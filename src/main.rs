use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use ioffer_match::config::Settings;
use ioffer_match::core::{Catalog, Recommender};
use ioffer_match::error::{handle_json_payload_error, handle_path_error};
use ioffer_match::routes::{self, AppState};
use ioffer_match::services::{AiClient, AuthService, ProfileStore};
use ioffer_match::telemetry;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| startup_error("Configuration error", e))?;

    telemetry::init(&settings.logging).map_err(|e| startup_error("Logging error", e))?;

    info!("Starting ioffer-match recommendation service...");

    if settings.uses_dev_secret() {
        warn!("Using the built-in development JWT secret; set JWT_SECRET in production");
    }

    // Load the school catalog once; it is read-only from here on
    let catalog = Catalog::load(settings.catalog.path.as_deref())
        .map_err(|e| startup_error("Catalog error", e))?;
    info!("School catalog loaded ({} schools)", catalog.len());

    let weights = settings.weights();
    if (weights.total() - 1.0).abs() > 1e-6 {
        warn!("Scoring weights sum to {:.3}, not 1.0; scores will be clamped", weights.total());
    }

    let recommender = Recommender::new(
        Arc::new(catalog),
        weights,
        settings.thresholds(),
        settings.recommendation.default_limit,
        settings.recommendation.max_limit,
    );

    info!("Recommender initialized with weights: {:?}", weights);

    let ai = AiClient::new(
        settings.ai.endpoint.clone(),
        settings.ai.api_key.clone(),
        settings.ai.timeout_secs,
    )
    .map_err(|e| startup_error("AI client error", e))?;

    if ai.is_configured() {
        info!("AI provider configured");
    } else {
        info!("No AI provider configured, using template responses");
    }

    let auth = AuthService::with_hash_rounds(
        &settings.auth.jwt_secret,
        settings.auth.token_ttl_hours,
        settings.auth.hash_rounds,
    );

    // Build application state
    let app_state = AppState {
        recommender,
        auth: Arc::new(auth),
        profiles: Arc::new(ProfileStore::new()),
        ai: Arc::new(ai),
        strict_validation: settings.recommendation.strict_validation,
        cookie_secure: settings.auth.cookie_secure,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
