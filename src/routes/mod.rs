pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::auth::AuthMiddleware;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    )
    .service(
        web::scope("/tasks")
            .wrap(AuthMiddleware)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> impl Responder {
    HttpResponse::NotFound().json(json!({
        "error": "NOT_FOUND",
        "message": format!("Route {} {} not found", req.method(), req.path()),
    }))
}
