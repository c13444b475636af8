//! Matcher configuration.
//!
//! The defaults describe the reference deployment: 8 matching nodes, any 6
//! of which can reconstruct a comparison, over the 1024-bit reference prime.
//!
//! | Variable                 | Meaning                          | Default        |
//! |--------------------------|----------------------------------|----------------|
//! | `DARK_MATCHER_PARTIES`   | fragments per order (`n`)        | 8              |
//! | `DARK_MATCHER_THRESHOLD` | reconstruction threshold (`k`)   | 6              |
//! | `DARK_MATCHER_PRIME_HEX` | field modulus, big-endian hex    | reference prime |

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::shamir::Prime;

pub const ENV_PARTIES: &str = "DARK_MATCHER_PARTIES";
pub const ENV_THRESHOLD: &str = "DARK_MATCHER_THRESHOLD";
pub const ENV_PRIME_HEX: &str = "DARK_MATCHER_PRIME_HEX";

/// Threshold parameters shared by every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Number of fragments each order is split into (`n`)
    pub parties: usize,

    /// Comparison fragments needed to reconstruct a comparison (`k`)
    pub threshold: usize,

    /// Field modulus
    pub prime: Prime,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            parties: 8,
            threshold: 6,
            prime: Prime::reference(),
        }
    }
}

impl MatcherConfig {
    /// Create a validated configuration
    pub fn new(parties: usize, threshold: usize, prime: Prime) -> Result<Self, ConfigError> {
        let config = Self { parties, threshold, prime };
        config.validate()?;
        Ok(config)
    }

    /// Check `1 <= threshold <= parties`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold == 0 || self.threshold > self.parties {
            return Err(ConfigError::InvalidThreshold {
                threshold: self.threshold,
                parties: self.parties,
            });
        }
        Ok(())
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(parties) = parse(&lookup, ENV_PARTIES)? {
            config.parties = parties;
        }
        if let Some(threshold) = parse(&lookup, ENV_THRESHOLD)? {
            config.threshold = threshold;
        }
        if let Some(hex) = lookup(ENV_PRIME_HEX) {
            config.prime = Prime::from_hex(&hex)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
