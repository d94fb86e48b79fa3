use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod agents;
mod ai;
mod config;
mod controllers;
mod db;
mod models;
mod tools;

use agents::{DispatchGraph, Router, Specialist, SpecialistKind};
use ai::GeminiClient;
use config::Config;
use db::Database;
use models::SessionStore;
use tools::ToolContext;

pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: Arc<SessionStore>,
    pub graph: Arc<DispatchGraph>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    log::info!("Initializing tool registry");
    let tool_registry = Arc::new(tools::create_default_registry());
    log::info!("Registered {} tools", tool_registry.len());

    let client = GeminiClient::new(
        &config.gemini_api_key,
        &config.gemini_endpoint,
        &config.gemini_model,
        config::MODEL_TEMPERATURE,
    )
    .expect("Failed to create AI client");
    let client = Arc::new(client);
    log::info!("Using model {} at {}", config.gemini_model, config.gemini_endpoint);

    log::info!("Building dispatch graph");
    let graph = Arc::new(DispatchGraph::new(
        Arc::new(Router::new(client.clone())),
        Arc::new(Specialist::new(
            SpecialistKind::Triage,
            client.clone(),
            &tool_registry,
        )),
        Arc::new(Specialist::new(
            SpecialistKind::Logistics,
            client.clone(),
            &tool_registry,
        )),
        Arc::new(Specialist::new(
            SpecialistKind::Medical,
            client.clone(),
            &tool_registry,
        )),
        tool_registry.clone(),
        ToolContext::new(db.clone()),
    ));

    let sessions = Arc::new(SessionStore::new());

    log::info!("Starting ResQ-Link server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                sessions: Arc::clone(&sessions),
                graph: Arc::clone(&graph),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::chat::config)
            .configure(controllers::incidents::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
