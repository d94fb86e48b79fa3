use actix_web::{web, HttpResponse, Responder};

/// Version from Cargo.toml, available at compile time
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "resq-link",
        "version": VERSION
    }))
}
