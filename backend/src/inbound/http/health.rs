//! Health endpoints: process probes for orchestration plus the database
//! reachability check used by operators.
//!
//! ```text
//! GET /api/health
//! GET /api/health/db
//! GET /api/health/ready
//! GET /api/health/live
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde_json::json;
use tracing::error;

use crate::inbound::http::state::HttpState;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state. When false, liveness probes emit 503.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Cheap process check; never touches the database.
#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Process is up", body = Object, example = json!({"ok": true})))
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true }))
}

/// Round-trip to the database.
///
/// A failed probe still reports `ok: true` for the process, with `db: false`.
#[utoipa::path(
    get,
    path = "/api/health/db",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Database reachable", body = Object,
            example = json!({"ok": true, "db": true, "now": "2024-03-09T10:00:00Z"})),
        (status = 500, description = "Database unreachable", body = Object,
            example = json!({"ok": true, "db": false, "error": "database connection failed"}))
    )
)]
#[get("/health/db")]
pub async fn health_db(state: web::Data<HttpState>) -> HttpResponse {
    match state.db_health.now().await {
        Ok(now) => HttpResponse::Ok().json(json!({ "ok": true, "db": true, "now": now })),
        Err(err) => {
            error!(error = %err, "database health probe failed");
            HttpResponse::InternalServerError().json(json!({
                "ok": true,
                "db": false,
                "error": err.to_string(),
            }))
        }
    }
}

/// Readiness probe. 200 once the pool and migrations are in place, 503 otherwise.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. 200 while the process is marked alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/api/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}
