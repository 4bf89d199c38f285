use actix_cors::Cors;
use actix_web::{http::header, middleware::from_fn, middleware::Logger, web, App, HttpServer};
use scouting_server::cache::CompetitionNames;
use scouting_server::config::Settings;
use scouting_server::db::{user_repo, Datastore};
use scouting_server::provider::ProviderClient;
use scouting_server::{http, metrics};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Configuration
    let settings =
        Settings::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_filter()))
        .init();

    // Postgres pool, or the in-memory fallback
    let db = Datastore::connect(&settings)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e:#}")))?;
    if !db.is_persistent() {
        match (&settings.seed_admin_email, &settings.seed_admin_password) {
            (Some(email), Some(password)) => {
                let created = user_repo::seed_admin(&db, email, password)
                    .await
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("{e:#}")))?;
                if created {
                    log::info!("seeded admin {email} into the in-memory store");
                }
            }
            _ => log::warn!("in-memory store has no accounts; set ADMIN_EMAIL and ADMIN_PASSWORD"),
        }
    }

    // Upstream provider
    let client = ProviderClient::new(&settings.provider)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    if settings.provider.is_configured() {
        client.test_connection().await;
    } else {
        log::warn!("provider credentials not set; catalogue endpoints will fail");
    }

    let competitions = web::Data::new(CompetitionNames::new());
    let settings = web::Data::new(settings);
    let server_addr = settings.server_addr.clone();
    log::info!("listening on {server_addr}");

    HttpServer::new(move || {
        let cors = settings
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(from_fn(metrics::track_requests))
            .app_data(settings.clone())
            .app_data(competitions.clone())
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(client.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
