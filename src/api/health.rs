use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tracing::error;

use crate::api::job::JobService;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Ping the job store and report `up` or `down` status labels
async fn probe(service: &JobService, up: &'static str, down: &'static str) -> HttpResponse {
    match service.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} check failed: {}", up, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                database: "disconnected",
                error: Some(format!("Database unavailable: {}", e)),
            })
        }
    }
}

/// General health check including database connectivity.
#[get("/health")]
async fn health_check(service: web::Data<JobService>) -> impl Responder {
    probe(&service, "healthy", "unhealthy").await
}

/// Readiness check, 503 while the database is unreachable.
#[get("/ready")]
async fn readiness_check(service: web::Data<JobService>) -> impl Responder {
    probe(&service, "ready", "not_ready").await
}

/// Liveness check. Does not check dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        database: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
