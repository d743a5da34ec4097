//! Threshold Bet
//!
//! Pick a threshold in 0..=9999, wager part of your balance, and bet that the
//! next draw lands above or below it. Thresholds far from the midpoint pay
//! up to 10x.
//!
//! ## Architecture
//!
//! - **Engine**: pure odds functions + single-transaction settlement
//! - **Storage**: ReDB (ACID) + DashMap (balance cache)
//! - **Server**: Axum
//! - **Auth**: HS256 bearer tokens (`sub` = user id)

pub mod auth;
pub mod config;
pub mod game;
pub mod routes;
pub mod storage;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use auth::{issue_token, verify_token, AuthUser, Claims};
pub use config::{Config, ConfigError};
pub use game::{
    payout_multiplier, quote, win_probability, Bet, BetEngine, BetQuote, BetReceipt, BetRequest,
    BetWithGame, Game, GameError, GameResult, NumberSource, ScriptedSource, ThreadRngSource,
    DRAW_RANGE, MAX_THRESHOLD, MIDPOINT,
};
pub use routes::{build_router, AppState};
pub use storage::{BetDraft, GameStore, StoreStats};
