use actix_web::{web, HttpResponse};
use std::time::Instant;

use crate::app_state::AppState;

pub const SERVICE_NAME: &str = "community-service";

/// Readiness: checks out a pooled connection and runs `SELECT 1`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    let result = match db_pool::acquire_with_metrics(&state.db, SERVICE_NAME).await {
        Ok(mut conn) => sqlx::query("SELECT 1").execute(&mut *conn).await.map(|_| ()),
        Err(e) => Err(e),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "database": { "status": "healthy", "latency_ms": latency_ms }
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "database": { "status": "unhealthy", "latency_ms": latency_ms },
                "error": format!("PostgreSQL connection failed: {}", e)
            }))
        }
    }
}

pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
