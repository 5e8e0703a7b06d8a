//! Configuration loaded from the environment
//!
//! `.env` is read first (if present), then:
//!
//! - `PORT` - Server port number (default: 8080)
//! - `DATABASE_URL` - Path to database file (default: "data.db")
//! - `BCRYPT_COST` - bcrypt cost factor for stored passwords (default: 12)
//! - `RUST_LOG` - tracing filter (default: "natours=debug,tower_http=debug")

use std::env;

use crate::error::{AppError, AppResult};
use crate::password::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "data.db";
pub const DEFAULT_LOG_FILTER: &str = "natours=debug,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub bcrypt_cost: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup
    ///
    /// An unparsable `PORT` falls back to the default; an out-of-range
    /// `BCRYPT_COST` is rejected since it would fail every user creation.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            None => DEFAULT_BCRYPT_COST,
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|cost| (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(cost))
                .ok_or_else(|| {
                    AppError::Configuration(format!(
                        "BCRYPT_COST must be between {} and {}, got '{value}'",
                        MIN_BCRYPT_COST,
                        MAX_BCRYPT_COST
                    ))
                })?,
        };

        Ok(Self {
            port,
            database_url,
            bcrypt_cost,
            log_filter,
        })
    }
}
