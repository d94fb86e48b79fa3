use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/incidents").route(web::get().to(list_incidents)));
}

/// Read-only view of logged incidents, newest first.
async fn list_incidents(state: web::Data<AppState>) -> impl Responder {
    match state.db.list_incidents() {
        Ok(incidents) => HttpResponse::Ok().json(incidents),
        Err(e) => {
            log::error!("Failed to list incidents: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal server error".to_string(),
            })
        }
    }
}
