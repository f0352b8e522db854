//! Single binary web server for the bracket REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, and BRACKET_SEED for a reproducible shuffle.

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use knockout_tournament_web::api::{configure, AppState};
use knockout_tournament_web::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    if let Some(seed) = config.bracket_seed {
        log::warn!("Bracket shuffle seeded with {}; brackets are reproducible", seed);
    }
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(AppState::new(config.rng()));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
