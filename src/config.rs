//! Configuration loader for the review watch bot.
//!
//! Values come from the process environment, falling back to a `.env` file.
//! Three values are required; the rest have defaults matching the public
//! review-status API.
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";
pub const RETRY_PERIOD_SECS: &str = "RETRY_PERIOD_SECS";

pub const ENV_FILE: &str = ".env";
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;

const REQUIRED: [&str; 3] = [PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("cannot read environment file: {0}")]
    EnvFile(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
    pub endpoint: String,
    pub retry_period: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint)
            .field("retry_period", &self.retry_period)
            .finish_non_exhaustive()
    }
}

/// Blank values count as missing.
fn non_blank<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Names of required credentials that are absent or blank.
pub fn missing_tokens<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED
        .iter()
        .copied()
        .filter(|name| non_blank(&lookup, name).is_none())
        .collect()
}

/// Returns true when every required credential is present.
pub fn check_tokens<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    missing_tokens(lookup).is_empty()
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Lookup over the process environment with `path` as a fallback source.
/// A missing file is not an error; process variables always win.
pub fn layered_lookup(path: &Path) -> Result<impl Fn(&str) -> Option<String>, ConfigError> {
    let mut file_vars = HashMap::new();
    if path.exists() {
        let entries =
            dotenvy::from_path_iter(path).map_err(|err| ConfigError::EnvFile(err.to_string()))?;
        for entry in entries {
            let (key, value) = entry.map_err(|err| ConfigError::EnvFile(err.to_string()))?;
            file_vars.insert(key, value);
        }
    }
    Ok(move |name: &str| env_lookup(name).or_else(|| file_vars.get(name).cloned()))
}

impl Config {
    /// Build a config from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = missing_tokens(&lookup);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let endpoint =
            non_blank(&lookup, PRACTICUM_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let retry_secs = match non_blank(&lookup, RETRY_PERIOD_SECS) {
            None => DEFAULT_RETRY_PERIOD_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "{RETRY_PERIOD_SECS} must be a positive integer, got {raw:?}"
                    )))
                }
            },
        };

        Ok(Self {
            practicum_token: non_blank(&lookup, PRACTICUM_TOKEN).unwrap_or_default(),
            telegram_token: non_blank(&lookup, TELEGRAM_TOKEN).unwrap_or_default(),
            chat_id: non_blank(&lookup, TELEGRAM_CHAT_ID).unwrap_or_default(),
            endpoint,
            retry_period: Duration::from_secs(retry_secs),
        })
    }
}
