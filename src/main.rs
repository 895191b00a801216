use std::io;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, web, App, HttpServer};
use dotenvy::dotenv;
use tracing::info;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use finance_ledger::config::AppConfig;
use finance_ledger::session::SessionStore;
use finance_ledger::{configure_api, configure_auth, db, openapi};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .map_err(|e| io::Error::other(format!("Failed to open {}: {e}", config.database_url)))?;

    // One session per process, shared by every worker
    let session = web::Data::new(
        SessionStore::load(pool.clone())
            .await
            .map_err(|e| io::Error::other(e.to_string()))?,
    );

    // ~1 request per second with burst of 5 on register/login
    let auth_governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .finish()
        .ok_or_else(|| io::Error::other("Invalid rate limiter config"))?;

    info!(
        "Starting server at http://{}:{}",
        config.bind_address, config.port
    );

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let allowed_origins = allowed_origins.clone();

        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins.iter().any(|allowed| allowed == origin_str)
            })
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            // Middleware (order matters: outer to inner)
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(session.clone())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
            .configure(configure_api)
            // Rate-limited scope last so it does not shadow the routes above
            .service(
                web::scope("")
                    .wrap(Governor::new(&auth_governor_config))
                    .configure(configure_auth),
            )
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
