use axum::{extract::State, response::IntoResponse, Json};

use super::AppState;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.store().stats() {
        Ok(stats) => Json(serde_json::json!({
            "status": "healthy",
            "version": VERSION,
            "store": stats,
        })),
        Err(e) => Json(serde_json::json!({
            "status": "degraded",
            "version": VERSION,
            "error": e.to_string(),
        })),
    }
}
