//! Bet Engine
//!
//! Validates a wager, then settles it inside a single store transaction.

use std::sync::Arc;

use tracing::{info, warn};

use super::odds::{is_winning_draw, payout_multiplier, validate_amount, validate_threshold};
use super::rng::NumberSource;
use super::types::{BetReceipt, BetRequest, BetWithGame};
use super::{GameError, GameResult};
use crate::storage::{BetDraft, GameStore};

/// Default number of bets returned by `bet_history`
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Settles bets against a `GameStore` using an injected draw source
#[derive(Clone)]
pub struct BetEngine {
    store: GameStore,
    rng: Arc<dyn NumberSource>,
    starting_balance: f64,
    history_limit: usize,
}

impl BetEngine {
    pub fn new(store: GameStore, rng: Arc<dyn NumberSource>, starting_balance: f64) -> Self {
        Self {
            store,
            rng,
            starting_balance,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Lower the history size; never above `DEFAULT_HISTORY_LIMIT`
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.min(DEFAULT_HISTORY_LIMIT);
        self
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Create the user with the starting balance if it does not exist yet
    pub fn open_account(&self, user_id: &str) -> GameResult<f64> {
        self.store.create_user(user_id, self.starting_balance)
    }

    /// Place and settle a bet.
    ///
    /// Input is validated before the store is touched. Balance check, draw,
    /// game/bet inserts and the balance update then run in one transaction.
    pub fn place_bet(&self, user_id: &str, request: &BetRequest) -> GameResult<BetReceipt> {
        let amount = validate_amount(request.amount)?;
        let threshold = validate_threshold(request.threshold)?;
        let is_above = request.is_above;

        let result = self.store.settle_bet(user_id, |balance| {
            if amount > balance {
                return Err(GameError::InsufficientBalance {
                    available: balance,
                    required: amount,
                });
            }

            let multiplier = payout_multiplier(threshold as f64);
            let number = self.rng.draw();
            let won = is_winning_draw(number, threshold, is_above);
            let payout = if won { amount * multiplier } else { 0.0 };

            Ok(BetDraft {
                amount,
                threshold,
                is_above,
                number,
                payout,
                won,
            })
        });

        match &result {
            Ok(receipt) => info!(
                user = %user_id,
                amount,
                threshold,
                is_above,
                number = receipt.game.number,
                won = receipt.bet.won,
                payout = receipt.bet.payout,
                new_balance = receipt.new_balance,
                "Bet settled"
            ),
            Err(e) => warn!(user = %user_id, amount, threshold, error = %e, "Bet rejected"),
        }

        result
    }

    /// Most recent bets for the user, newest first
    pub fn bet_history(&self, user_id: &str) -> GameResult<Vec<BetWithGame>> {
        self.store.recent_bets(user_id, self.history_limit)
    }

    /// Current balance
    pub fn user_balance(&self, user_id: &str) -> GameResult<f64> {
        self.store
            .get_balance(user_id)?
            .ok_or_else(|| GameError::NotFound(user_id.to_string()))
    }
}
