//! Game Module - Threshold Betting
//!
//! A player picks a threshold in `0..=9999`, wagers part of their balance and
//! predicts whether the next draw lands above or below it. The further the
//! threshold sits from the midpoint, the larger the multiplier.
//!
//! ## Flow:
//! 1. Validate amount and threshold (no storage access yet)
//! 2. Open a write transaction and read the balance
//! 3. Reject if the wager exceeds the balance
//! 4. Draw, settle, write game + bet + new balance
//! 5. Commit (or drop everything on any failure)

pub mod engine;
pub mod odds;
pub mod rng;
pub mod types;

pub use engine::BetEngine;
pub use odds::{payout_multiplier, quote, win_probability, DRAW_RANGE, MAX_THRESHOLD, MIDPOINT};
pub use rng::{NumberSource, ScriptedSource, ThreadRngSource};
pub use types::{Bet, BetQuote, BetReceipt, BetRequest, BetWithGame, Game};

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

/// Game errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Insufficient balance: have {available:.2}, need {required:.2}")]
    InsufficientBalance { available: f64, required: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
