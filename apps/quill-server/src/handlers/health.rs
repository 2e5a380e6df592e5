//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<bool>,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    #[cfg(feature = "postgres")]
    let database = match &state.db {
        Some(db) => Some(db.ping().await),
        None => None,
    };
    #[cfg(not(feature = "postgres"))]
    let database = None;

    let response = HealthResponse {
        status: if database == Some(false) { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage_backend(),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
