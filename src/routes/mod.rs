// ============================================================================
// ROUTES - HTTP surface for the betting game
// ============================================================================
//
// Route Organization:
// - game.rs:   bet placement, history, balance, account, quote
// - health.rs: liveness + store counters
//
// Game routes (except /game/quote) require `Authorization: Bearer <jwt>`.
// Errors come back as `{ "success": false, "error": "…" }`.
//
// ============================================================================

pub mod game;
pub mod health;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::game::{BetEngine, GameError};

/// Shared handler state. `Clone` is cheap.
#[derive(Clone)]
pub struct AppState {
    pub engine: BetEngine,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(engine: BetEngine, jwt_secret: &str) -> Self {
        Self {
            engine,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

/// HTTP status for each error kind
pub fn status_for(err: &GameError) -> StatusCode {
    match err {
        GameError::NotFound(_) => StatusCode::NOT_FOUND,
        GameError::InsufficientBalance { .. } | GameError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        GameError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a `GameError` into the JSON error response
pub fn reject(err: GameError) -> (StatusCode, Json<serde_json::Value>) {
    (
        status_for(&err),
        Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    )
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/game/quote", get(game::quote_handler))
        .route("/game/account", post(game::open_account_handler))
        .route("/game/bet", post(game::place_bet_handler))
        .route("/game/history", get(game::history_handler))
        .route("/game/balance", get(game::balance_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
