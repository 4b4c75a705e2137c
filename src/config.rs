//! Configuration Module
//!
//! Decides which cache driver to build and how to reach it, from environment
//! variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Available cache drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// Process-local expiring store
    Memory,
    /// Remote Redis server
    Redis,
}

impl DriverKind {
    /// Name used in configuration and reported by `Cache::driver_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverKind::Memory => "memory",
            DriverKind::Redis => "redis",
        }
    }
}

impl FromStr for DriverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(DriverKind::Memory),
            "redis" => Ok(DriverKind::Redis),
            other => Err(ConfigError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings handed to the Redis client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisOptions {
    /// `host:port` of the server
    pub addr: String,
    /// Password, if the server requires one
    pub password: Option<String>,
    /// Logical database index
    pub db: u32,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            password: None,
            db: 0,
        }
    }
}

/// Cache configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which backend satisfies the cache abstraction
    pub driver: DriverKind,
    /// Remote backend settings, ignored by the memory driver
    pub redis: RedisOptions,
    /// Seconds between sweeps of the in-memory store
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TYPE` - `memory` or `redis` (default: redis)
    /// - `REDIS_ADDR` - Redis address (default: 127.0.0.1:6379)
    /// - `REDIS_PASSWORD` - Redis password (default: none)
    /// - `REDIS_DB` - Redis logical database (default: 0)
    /// - `CACHE_SWEEP_INTERVAL` - Memory sweep frequency in seconds (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let driver = match var("CACHE_TYPE") {
            Some(name) => name.parse()?,
            None => defaults.driver,
        };

        let redis = RedisOptions {
            addr: var("REDIS_ADDR").unwrap_or(defaults.redis.addr),
            password: var("REDIS_PASSWORD"),
            db: parse_number("REDIS_DB", var("REDIS_DB"), defaults.redis.db)?,
        };

        let sweep_interval = parse_number(
            "CACHE_SWEEP_INTERVAL",
            var("CACHE_SWEEP_INTERVAL"),
            defaults.sweep_interval,
        )?;
        if sweep_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(Self {
            driver,
            redis,
            sweep_interval,
        })
    }
}

fn parse_number<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var: name, value }),
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: DriverKind::Redis,
            redis: RedisOptions::default(),
            sweep_interval: 1,
        }
    }
}
