// Service configuration read from the environment.
//
// Variables
// - GALLERY_HTTP_ADDR           listen address, default 0.0.0.0:8080
// - GALLERY_RETRY_DELAY_MS      delay between conflict retries, default 1000
// - GALLERY_RETRY_MAX_ATTEMPTS  unset means retry forever
// - GALLERY_LANE_CAPACITY       buffered events per lane, default 1024

use crate::shared::infrastructure::retry::FixedDelay;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const HTTP_ADDR: &str = "GALLERY_HTTP_ADDR";
pub const RETRY_DELAY_MS: &str = "GALLERY_RETRY_DELAY_MS";
pub const RETRY_MAX_ATTEMPTS: &str = "GALLERY_RETRY_MAX_ATTEMPTS";
pub const LANE_CAPACITY: &str = "GALLERY_LANE_CAPACITY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub retry_delay: Duration,
    pub retry_max_attempts: Option<u32>,
    pub lane_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            retry_delay: FixedDelay::DEFAULT_DELAY,
            retry_max_attempts: None,
            lane_capacity: 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let retry_delay_ms: Option<u64> = parse(&lookup, RETRY_DELAY_MS)?;
        let retry_max_attempts: Option<u32> = parse(&lookup, RETRY_MAX_ATTEMPTS)?;
        let lane_capacity: Option<usize> = parse(&lookup, LANE_CAPACITY)?;

        if retry_max_attempts == Some(0) {
            return Err(invalid(RETRY_MAX_ATTEMPTS, "0", "must be at least 1"));
        }
        if lane_capacity == Some(0) {
            return Err(invalid(LANE_CAPACITY, "0", "must be at least 1"));
        }

        Ok(Self {
            http_addr: parse(&lookup, HTTP_ADDR)?.unwrap_or(defaults.http_addr),
            retry_delay: retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            retry_max_attempts,
            lane_capacity: lane_capacity.unwrap_or(defaults.lane_capacity),
        })
    }

    pub fn retry_strategy(&self) -> FixedDelay {
        match self.retry_max_attempts {
            Some(max_attempts) => FixedDelay::bounded(self.retry_delay, max_attempts),
            None => FixedDelay::forever(self.retry_delay),
        }
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|error: T::Err| invalid(key, &value, &error.to_string())),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
