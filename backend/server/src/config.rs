use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    ops::RangeInclusive,
    path::PathBuf,
    str::FromStr,
};

use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

// One year at most, keeps expiry arithmetic well inside chrono's range.
const TOKEN_TTL_HOURS: RangeInclusive<i64> = 1..=24 * 366;
// What bcrypt accepts.
const BCRYPT_COST: RangeInclusive<u32> = 4..=31;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Secret {0} not found in /run/secrets or the environment")]
    MissingSecret(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub store: StoreBackend,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            store: try_load("STORE_BACKEND", "redis")?,
            jwt_secret: read_secret("JWT_SECRET")?,
            token_ttl_hours: in_range(
                "TOKEN_TTL_HOURS",
                try_load("TOKEN_TTL_HOURS", "168")?,
                TOKEN_TTL_HOURS,
            )?,
            bcrypt_cost: in_range("BCRYPT_COST", try_load("BCRYPT_COST", "12")?, BCRYPT_COST)?,
            cors_origin: try_load("CORS_ORIGIN", "*")?,
            static_dir: var("STATIC_DIR").ok().map(PathBuf::from),
        })
    }

    /// In-memory settings for tests and local tinkering.
    pub fn local(jwt_secret: &str) -> Self {
        Self {
            port: 0,
            redis_url: String::new(),
            store: StoreBackend::Memory,
            jwt_secret: jwt_secret.to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cors_origin: "*".to_string(),
            static_dir: None,
        }
    }
}

fn var(key: &str) -> Result<String, env::VarError> {
    env::var(key)
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse_value(
        key,
        var(key).unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }),
    )
}

fn parse_value<T: FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }
    })
}

fn in_range<T: PartialOrd + Display>(
    key: &'static str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    if range.contains(&value) {
        return Ok(value);
    }

    warn!("Invalid {key} value: {value}");
    Err(ConfigError::Invalid {
        key,
        reason: format!(
            "{value} is outside {}..={}",
            range.start(),
            range.end()
        ),
    })
}

fn read_secret(secret_name: &'static str) -> Result<String, ConfigError> {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .or_else(|e| {
            warn!("Failed to read {secret_name} from file: {e}, trying environment");
            var(secret_name).map(|s| s.trim().to_string())
        })
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingSecret(secret_name))
}
