// ============================================================================
// CONFIGURATION - .env + environment variables
// ============================================================================
//
//   BET_BIND_ADDR         HTTP listen address        (default 0.0.0.0:8080)
//   BET_DATA_PATH         ReDB data directory        (default ./game_data)
//   BET_JWT_SECRET        HS256 bearer token secret  (required)
//   BET_STARTING_BALANCE  balance for new accounts   (default 10000)
//   BET_HISTORY_LIMIT     bets returned by history   (1..=10, default 10)
//
// ============================================================================

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::game::engine::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_PATH: &str = "./game_data";
pub const DEFAULT_STARTING_BALANCE: f64 = 10_000.0;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_path: String,
    pub jwt_secret: String,
    pub starting_balance: f64,
    pub history_limit: usize,
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("BET_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("BET_JWT_SECRET"))?;

        let bind_addr = parse_or(&lookup, "BET_BIND_ADDR", || SocketAddr::from(([0, 0, 0, 0], 8080)))?;
        let starting_balance: f64 = parse_or(&lookup, "BET_STARTING_BALANCE", || DEFAULT_STARTING_BALANCE)?;
        if !starting_balance.is_finite() || starting_balance < 0.0 {
            return Err(ConfigError::Invalid {
                key: "BET_STARTING_BALANCE",
                value: starting_balance.to_string(),
            });
        }
        let history_limit: usize = parse_or(&lookup, "BET_HISTORY_LIMIT", || DEFAULT_HISTORY_LIMIT)?;
        if history_limit == 0 || history_limit > DEFAULT_HISTORY_LIMIT {
            return Err(ConfigError::Invalid {
                key: "BET_HISTORY_LIMIT",
                value: history_limit.to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            data_path: lookup("BET_DATA_PATH").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            jwt_secret,
            starting_balance,
            history_limit,
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    D: FnOnce() -> T,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default()),
    }
}
