// ============================================================================
// GAME ROUTES
// ============================================================================
//
// POST /game/account   open account (idempotent)        → { balance }
// POST /game/bet       { amount, threshold, is_above }   → { game, bet, new_balance }
// GET  /game/history   last bets, newest first           → [ { …bet, game } ]
// GET  /game/balance                                     → { balance }
// GET  /game/quote?amount=&threshold=  (public)          → BetQuote
//
// ============================================================================

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{reject, AppState};
use crate::auth::AuthUser;
use crate::game::{self, BetEngine, BetQuote, BetReceipt, BetRequest, BetWithGame, GameError, GameResult};

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Run a store-bound engine call off the async workers.
///
/// Settlement waits on the ReDB writer lock, so it must not park a runtime thread.
async fn run_blocking<T, F>(engine: BetEngine, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&BetEngine) -> GameResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| reject(GameError::Storage(format!("engine task failed: {}", e))))?
        .map_err(reject)
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    reject(GameError::InvalidInput(format!("malformed bet: {}", rejection.body_text())))
}

fn bad_query(rejection: QueryRejection) -> ApiError {
    reject(GameError::InvalidInput(format!("malformed quote: {}", rejection.body_text())))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub amount: f64,
    pub threshold: i64,
}

/// POST /game/account
pub async fn open_account_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = run_blocking(state.engine, move |engine| engine.open_account(&user_id)).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// POST /game/bet
///
/// Body rejections (bad JSON, non-integer or oversized threshold) are
/// reported as invalid input like any other validation failure.
pub async fn place_bet_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<BetRequest>, JsonRejection>,
) -> Result<Json<BetReceipt>, ApiError> {
    let Json(req) = payload.map_err(bad_body)?;
    let receipt = run_blocking(state.engine, move |engine| engine.place_bet(&user_id, &req)).await?;
    Ok(Json(receipt))
}

/// GET /game/history
pub async fn history_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BetWithGame>>, ApiError> {
    let history = run_blocking(state.engine, move |engine| engine.bet_history(&user_id)).await?;
    Ok(Json(history))
}

/// GET /game/balance
pub async fn balance_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = run_blocking(state.engine, move |engine| engine.user_balance(&user_id)).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// GET /game/quote
pub async fn quote_handler(
    params: Result<Query<QuoteParams>, QueryRejection>,
) -> Result<Json<BetQuote>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let quote = game::quote(params.amount, params.threshold).map_err(reject)?;
    Ok(Json(quote))
}
