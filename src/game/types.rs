//! # Game Types
//!
//! Records persisted per bet and the shapes returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// PERSISTED RECORDS
// ============================================================================

/// One random draw. Created together with the bet that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    /// Drawn number in `0..=9999`
    pub number: u32,
    pub created_at: DateTime<Utc>,
}

/// A settled wager tying a user to a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: u64,
    pub user_id: String,
    pub game_id: u64,
    pub amount: f64,
    pub threshold: u32,
    pub is_above: bool,
    /// `amount × multiplier` on a win, 0 otherwise
    pub payout: f64,
    pub won: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// REQUESTS / RESPONSES
// ============================================================================

/// Raw bet parameters as submitted by the player.
///
/// Kept loose (`i64` threshold) so out-of-range values surface as
/// `InvalidInput` instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct BetRequest {
    pub amount: f64,
    pub threshold: i64,
    pub is_above: bool,
}

/// Outcome of `place_bet`
#[derive(Debug, Clone, Serialize)]
pub struct BetReceipt {
    pub game: Game,
    pub bet: Bet,
    pub new_balance: f64,
}

/// History row: a bet annotated with its game's drawn number
#[derive(Debug, Clone, Serialize)]
pub struct BetWithGame {
    #[serde(flatten)]
    pub bet: Bet,
    pub game: Game,
}

/// Pre-bet preview of what a threshold pays
#[derive(Debug, Clone, Serialize)]
pub struct BetQuote {
    pub amount: f64,
    pub threshold: u32,
    pub multiplier: f64,
    /// `[0, 1]` fraction
    pub win_probability: f64,
    pub win_probability_pct: f64,
    pub potential_payout: f64,
}
