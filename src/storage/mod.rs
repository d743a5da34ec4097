// ============================================================================
// GAME STORE - ACID STORAGE FOR BALANCES, GAMES AND BETS
// ============================================================================
//
// - ReDB: ACID embedded database holding users, games, bets and a per-user
//   bet index
// - DashMap: in-memory balance cache for hot reads
//
// ARCHITECTURE:
// ┌──────────────────────────────────────────────────────────┐
// │                       BetEngine                          │
// │                           │                              │
// │                           ▼                              │
// │                       GameStore                          │
// │                  ┌────────┴────────┐                     │
// │                  ▼                 ▼                     │
// │            ┌──────────┐    ┌──────────────────────┐      │
// │            │ DashMap  │    │        ReDB          │      │
// │            │(balances)│    │ users games bets idx │      │
// │            └──────────┘    └──────────────────────┘      │
// └──────────────────────────────────────────────────────────┘
//
// CONCURRENCY MODEL:
// - Reads: DashMap first, ReDB read transaction on a miss
// - Writes: a bet is settled inside ONE ReDB write transaction. ReDB admits
//   a single writer at a time, so the balance read, both inserts and the
//   balance write of one bet are serialized against every other bet.
// - Cache is refreshed only after commit, under a per-user lock so two
//   commits for the same user cannot land in the cache out of order.
//
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info};

use crate::game::types::{Bet, BetReceipt, BetWithGame, Game};
use crate::game::{GameError, GameResult};

// ============================================================================
// REDB TABLE DEFINITIONS
// ============================================================================

/// User balances: UserId → Balance
const USERS: TableDefinition<&str, f64> = TableDefinition::new("users");

/// Draws: GameId → Game (JSON)
const GAMES: TableDefinition<u64, &[u8]> = TableDefinition::new("games");

/// Bets: BetId → Bet (JSON)
const BETS: TableDefinition<u64, &[u8]> = TableDefinition::new("bets");

/// Per-user bet index: (UserId, BetId) → GameId
const USER_BETS: TableDefinition<(&str, u64), u64> = TableDefinition::new("user_bets");

/// Id counters: name → next id
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_GAME_ID: &str = "next_game_id";
const NEXT_BET_ID: &str = "next_bet_id";

fn storage_err<E: std::fmt::Display>(e: E) -> GameError {
    GameError::Storage(e.to_string())
}

// ============================================================================
// SETTLEMENT DRAFT
// ============================================================================

/// Everything the engine decides about a bet before it is written.
///
/// Produced inside the write transaction, after the balance has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct BetDraft {
    pub amount: f64,
    pub threshold: u32,
    pub is_above: bool,
    pub number: u32,
    pub payout: f64,
    pub won: bool,
}

/// Row counts
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub users: u64,
    pub games: u64,
    pub bets: u64,
}

// ============================================================================
// GAME STORE
// ============================================================================

/// Persistent store for balances, games and bets.
///
/// `Clone` is cheap (Arc handles).
#[derive(Clone)]
pub struct GameStore {
    db: Arc<Database>,
    balances: Arc<DashMap<String, f64>>,
    user_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl GameStore {
    /// Create or open a store under `path`
    pub fn new(path: &str) -> GameResult<Self> {
        info!(path = %path, "Opening ReDB database");

        std::fs::create_dir_all(path).map_err(storage_err)?;
        let db = Database::create(format!("{}/game.redb", path)).map_err(storage_err)?;

        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _ = write_txn.open_table(USERS).map_err(storage_err)?;
            let _ = write_txn.open_table(GAMES).map_err(storage_err)?;
            let _ = write_txn.open_table(BETS).map_err(storage_err)?;
            let _ = write_txn.open_table(USER_BETS).map_err(storage_err)?;
            let _ = write_txn.open_table(METADATA).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        // Warm the balance cache
        let balances = Arc::new(DashMap::new());
        {
            let read_txn = db.begin_read().map_err(storage_err)?;
            let table = read_txn.open_table(USERS).map_err(storage_err)?;
            for entry in table.iter().map_err(storage_err)? {
                let (key, value) = entry.map_err(storage_err)?;
                balances.insert(key.value().to_string(), value.value());
            }
        }

        info!(users = balances.len(), "Game store loaded");

        Ok(Self {
            db: Arc::new(db),
            balances,
            user_locks: Arc::new(DashMap::new()),
        })
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    // ========================================================================
    // USERS
    // ========================================================================

    /// Create a user with `starting_balance` unless it already exists.
    ///
    /// Returns the user's balance after the call.
    pub fn create_user(&self, user_id: &str, starting_balance: f64) -> GameResult<f64> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let write_txn = self.db.begin_write().map_err(storage_err)?;

        let (balance, created) = {
            let mut table = write_txn.open_table(USERS).map_err(storage_err)?;
            let existing = table
                .get(user_id)
                .map_err(storage_err)?
                .map(|v| v.value());

            match existing {
                Some(balance) => (balance, false),
                None => {
                    table.insert(user_id, starting_balance).map_err(storage_err)?;
                    (starting_balance, true)
                }
            }
        };

        write_txn.commit().map_err(storage_err)?;
        self.balances.insert(user_id.to_string(), balance);

        if created {
            info!(user = %user_id, balance, "User created");
        }
        Ok(balance)
    }

    /// Current balance, `None` if the user does not exist
    pub fn get_balance(&self, user_id: &str) -> GameResult<Option<f64>> {
        if let Some(balance) = self.balances.get(user_id) {
            return Ok(Some(*balance));
        }

        // A settle for this user holds the lock through commit + cache write,
        // so a miss is only filled with a value no older than the last commit.
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(USERS).map_err(storage_err)?;
        let balance = table
            .get(user_id)
            .map_err(storage_err)?
            .map(|v| v.value());

        if let Some(balance) = balance {
            self.balances.insert(user_id.to_string(), balance);
        }
        Ok(balance)
    }

    // ========================================================================
    // SETTLEMENT (single write transaction)
    // ========================================================================

    /// Settle one bet atomically.
    ///
    /// `decide` receives the balance read inside the write transaction and
    /// returns the draft to persist. If it (or any write) fails, the
    /// transaction is dropped uncommitted and nothing is visible.
    pub fn settle_bet<F>(&self, user_id: &str, decide: F) -> GameResult<BetReceipt>
    where
        F: FnOnce(f64) -> GameResult<BetDraft>,
    {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let write_txn = self.db.begin_write().map_err(storage_err)?;

        let (game, bet, new_balance) = {
            let mut users = write_txn.open_table(USERS).map_err(storage_err)?;
            let balance = users
                .get(user_id)
                .map_err(storage_err)?
                .map(|v| v.value())
                .ok_or_else(|| GameError::NotFound(user_id.to_string()))?;

            let draft = decide(balance)?;

            let mut meta = write_txn.open_table(METADATA).map_err(storage_err)?;
            let game_id = next_id(&mut meta, NEXT_GAME_ID)?;
            let bet_id = next_id(&mut meta, NEXT_BET_ID)?;
            let now = Utc::now();

            let game = Game {
                id: game_id,
                number: draft.number,
                created_at: now,
            };
            let bet = Bet {
                id: bet_id,
                user_id: user_id.to_string(),
                game_id,
                amount: draft.amount,
                threshold: draft.threshold,
                is_above: draft.is_above,
                payout: draft.payout,
                won: draft.won,
                created_at: now,
            };

            let game_json = serde_json::to_vec(&game).map_err(storage_err)?;
            let bet_json = serde_json::to_vec(&bet).map_err(storage_err)?;

            let mut games = write_txn.open_table(GAMES).map_err(storage_err)?;
            games.insert(game_id, game_json.as_slice()).map_err(storage_err)?;

            let mut bets = write_txn.open_table(BETS).map_err(storage_err)?;
            bets.insert(bet_id, bet_json.as_slice()).map_err(storage_err)?;

            let mut index = write_txn.open_table(USER_BETS).map_err(storage_err)?;
            index.insert((user_id, bet_id), game_id).map_err(storage_err)?;

            let new_balance = balance - draft.amount + draft.payout;
            users.insert(user_id, new_balance).map_err(storage_err)?;

            (game, bet, new_balance)
        };

        write_txn.commit().map_err(storage_err)?;
        self.balances.insert(user_id.to_string(), new_balance);

        debug!(
            user = %user_id,
            bet_id = bet.id,
            game_id = game.id,
            new_balance,
            "Bet committed"
        );

        Ok(BetReceipt {
            game,
            bet,
            new_balance,
        })
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    /// Most recent `limit` bets for a user, newest first, joined with games
    pub fn recent_bets(&self, user_id: &str, limit: usize) -> GameResult<Vec<BetWithGame>> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let index = read_txn.open_table(USER_BETS).map_err(storage_err)?;
        let bets = read_txn.open_table(BETS).map_err(storage_err)?;
        let games = read_txn.open_table(GAMES).map_err(storage_err)?;

        let mut history = Vec::new();
        let range = index
            .range((user_id, 0u64)..=(user_id, u64::MAX))
            .map_err(storage_err)?;

        for entry in range.rev().take(limit) {
            let (key, value) = entry.map_err(storage_err)?;
            let (_, bet_id) = key.value();
            let game_id = value.value();

            let bet_bytes = bets
                .get(bet_id)
                .map_err(storage_err)?
                .ok_or_else(|| GameError::Storage(format!("bet {} missing from index", bet_id)))?;
            let bet: Bet = serde_json::from_slice(bet_bytes.value()).map_err(storage_err)?;

            let game_bytes = games
                .get(game_id)
                .map_err(storage_err)?
                .ok_or_else(|| GameError::Storage(format!("game {} missing for bet {}", game_id, bet_id)))?;
            let game: Game = serde_json::from_slice(game_bytes.value()).map_err(storage_err)?;

            history.push(BetWithGame { bet, game });
        }

        Ok(history)
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    pub fn stats(&self) -> GameResult<StoreStats> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let users = read_txn.open_table(USERS).map_err(storage_err)?.len().map_err(storage_err)?;
        let games = read_txn.open_table(GAMES).map_err(storage_err)?.len().map_err(storage_err)?;
        let bets = read_txn.open_table(BETS).map_err(storage_err)?.len().map_err(storage_err)?;
        Ok(StoreStats { users, games, bets })
    }
}

/// Allocate the next id for `counter` (ids start at 1)
fn next_id(meta: &mut redb::Table<'_, &'static str, u64>, counter: &str) -> GameResult<u64> {
    let id = meta
        .get(counter)
        .map_err(storage_err)?
        .map(|v| v.value())
        .unwrap_or(1);
    meta.insert(counter, id + 1).map_err(storage_err)?;
    Ok(id)
}

// ============================================================================
// TESTS
// ============================================================================
