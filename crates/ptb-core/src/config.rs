use std::{
    env, fs,
    net::{Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use crate::{errors::Error, prompt::CategoryWeights, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RETRY_MIN_SECS: u64 = 15;
pub const DEFAULT_RETRY_MAX_SECS: u64 = 30;
pub const DEFAULT_UNEXPECTED_RETRY_SECS: u64 = 15;

/// Typed configuration for the bot process.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,

    // Liveness endpoint
    pub port: u16,

    // Reconnect policy
    pub retry_min: Duration,
    pub retry_max: Duration,
    pub unexpected_retry: Duration,

    // Prompt generator
    pub prompt_weights: CategoryWeights,
}

impl Config {
    /// Load from the process environment, after applying `.env` (if present).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `load()` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        let telegram_bot_token = telegram_bot_token.trim().to_string();

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let retry_min = parse_or(&lookup, "RETRY_MIN_SECS", DEFAULT_RETRY_MIN_SECS)?;
        let retry_max = parse_or(&lookup, "RETRY_MAX_SECS", DEFAULT_RETRY_MAX_SECS)?;
        if retry_min > retry_max {
            return Err(Error::Config(format!(
                "RETRY_MIN_SECS ({retry_min}) must not exceed RETRY_MAX_SECS ({retry_max})"
            )));
        }
        let unexpected_retry = parse_or(
            &lookup,
            "UNEXPECTED_RETRY_SECS",
            DEFAULT_UNEXPECTED_RETRY_SECS,
        )?;

        let prompt_weights = match lookup("PROMPT_WEIGHTS").and_then(non_empty) {
            Some(raw) => parse_weights(&raw)?,
            None => CategoryWeights::default(),
        };

        Ok(Self {
            telegram_bot_token,
            port,
            retry_min: Duration::from_secs(retry_min),
            retry_max: Duration::from_secs(retry_max),
            unexpected_retry: Duration::from_secs(unexpected_retry),
            prompt_weights,
        })
    }

    /// Liveness listener binds on all interfaces.
    pub fn liveness_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .map_err(|e| Error::Config(format!("{key} has invalid value {raw:?}: {e}")))
}

/// `"injured,uninjured,mixed"`, e.g. `1,2,2`.
fn parse_weights(raw: &str) -> Result<CategoryWeights> {
    let parts = raw
        .split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Config(format!("PROMPT_WEIGHTS has invalid value {raw:?}: {e}")))?;

    let [injured, uninjured, mixed] = parts[..] else {
        return Err(Error::Config(format!(
            "PROMPT_WEIGHTS must have exactly three comma-separated values, got {raw:?}"
        )));
    };

    let weights = CategoryWeights {
        injured,
        uninjured,
        mixed,
    };
    weights.validate()?;
    Ok(weights)
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, strip_quotes(v.trim()));
    }
}

fn strip_quotes(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
