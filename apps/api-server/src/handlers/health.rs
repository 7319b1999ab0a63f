//! Health check endpoint.

use actix_web::{HttpResponse, web};

use sage_shared::dto::{HealthResponse, SearchCapabilitiesResponse};

use crate::state::AppState;

/// Health check endpoint - returns server status and the search features
/// the store offers.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let capabilities = state.store.capabilities();
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        search: SearchCapabilitiesResponse {
            full_text: capabilities.full_text,
            trigram: capabilities.trigram,
        },
    };

    HttpResponse::Ok().json(response)
}
