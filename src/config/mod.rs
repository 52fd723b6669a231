use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::models::SeatLayout;

// Top-level configuration, assembled from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub redis: RedisConfig,
    pub layout: LayoutConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub reserve_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
    pub lock_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Option<String>,
    pub seat_map_ttl_secs: u64,
}

// Coach geometry and request limits
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub total_seats: u32,
    pub row_width: u32,
    pub max_seats_per_request: u32,
}

impl LayoutConfig {
    pub fn seat_layout(&self) -> SeatLayout {
        SeatLayout::new(self.total_seats, self.row_width)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_demo_reset: bool,
    pub demo_prebook_ratio: f64,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{}'", other),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown seat store '{}'", other),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(key, default);
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("{} must be valid, got '{}'", key, raw))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parse_var("PORT", "8000")?,
                environment: var_or("ENVIRONMENT", "development"),
                rust_log: var_or("RUST_LOG", "coach_booking=debug,tower_http=debug"),
                log_format: parse_var("LOG_FORMAT", "pretty")?,
                reserve_timeout_ms: parse_var("RESERVE_TIMEOUT_MS", "5000")?,
            },
            storage: StorageConfig {
                backend: parse_var("SEAT_STORE", "postgres")?,
                database_url: env::var("DATABASE_URL").ok(),
                pool_size: parse_var("DB_POOL_SIZE", "20")?,
                acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", "5")?,
                lock_timeout_ms: parse_var("DB_LOCK_TIMEOUT_MS", "3000")?,
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
                seat_map_ttl_secs: parse_var("SEAT_MAP_CACHE_TTL_SECS", "30")?,
            },
            layout: LayoutConfig {
                total_seats: parse_var("TOTAL_SEATS", "80")?,
                row_width: parse_var("ROW_WIDTH", "7")?,
                max_seats_per_request: parse_var("MAX_SEATS_PER_REQUEST", "7")?,
            },
            features: FeatureFlags {
                enable_demo_reset: parse_var("ENABLE_DEMO_RESET", "false")?,
                demo_prebook_ratio: parse_var("DEMO_PREBOOK_RATIO", "0.25")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if layout.total_seats == 0 || layout.row_width == 0 || layout.max_seats_per_request == 0 {
            bail!("TOTAL_SEATS, ROW_WIDTH and MAX_SEATS_PER_REQUEST must all be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.features.demo_prebook_ratio) {
            bail!("DEMO_PREBOOK_RATIO must be between 0 and 1");
        }
        if self.storage.backend == StoreBackend::Postgres && self.storage.database_url.is_none() {
            bail!("DATABASE_URL must be set when SEAT_STORE=postgres");
        }
        Ok(())
    }
}
