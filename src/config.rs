use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{BotError, Result};
use crate::locale::Locale;
use crate::store::DEFAULT_STORE_PATH;

const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;
// Discord allows ~50 requests per second globally
const DEFAULT_RATE_LIMIT: f64 = 40.0;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub application_id: String,
    pub store_path: PathBuf,
    pub locale: Locale,
    pub confirm_timeout: Duration,
    pub rate_limit: f64,
    pub register_on_start: bool,
}

impl Config {
    /// Build the configuration from compile-time values, falling back to the
    /// process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| compiled(key).or_else(|| env::var(key).ok()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BotError::new("missing_config").push_str(format!("{} is not set", key)))
        };

        let token = required("BOT_TOKEN")?;
        let application_id = required("CLIENT_ID")?;

        let store_path = lookup("LOCATIONS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

        let locale = match lookup("BOT_LOCALE") {
            Some(raw) => Locale::from_str(raw.trim()).map_err(|e| {
                BotError::new("invalid_config")
                    .push_str(format!("BOT_LOCALE={}", raw))
                    .push_std(e)
            })?,
            None => Locale::default(),
        };

        let confirm_timeout = Duration::from_secs(parse_or(
            &lookup,
            "CONFIRM_TIMEOUT_SECS",
            DEFAULT_CONFIRM_TIMEOUT_SECS,
        )?);
        let rate_limit = parse_or(&lookup, "DISCORD_RATE_LIMIT", DEFAULT_RATE_LIMIT)?;
        let register_on_start = parse_or(&lookup, "REGISTER_COMMANDS_ON_START", false)?;

        Ok(Self {
            token,
            application_id,
            store_path,
            locale,
            confirm_timeout,
            rate_limit,
            register_on_start,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            BotError::new("invalid_config").push_str(format!("{}={}: {}", key, raw, e))
        }),
        None => Ok(default),
    }
}

fn compiled(key: &str) -> Option<String> {
    let value = match key {
        "BOT_TOKEN" => option_env!("BOT_TOKEN"),
        "CLIENT_ID" => option_env!("CLIENT_ID"),
        _ => None,
    };
    value.map(String::from)
}
