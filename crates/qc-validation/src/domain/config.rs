//! Validation configuration.
//!
//! ```ignore
//! let config = ValidationConfig::from_env()?
//!     .with_network(NetworkIdentifier::Mainnet)
//!     .with_max_message_size(256);
//! config.validate()?;
//! ```

use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, BlockDuration, MosaicId, NetworkIdentifier};
use std::str::FromStr;

/// Chain parameters consumed by the default validators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Network every entity must target.
    pub network: NetworkIdentifier,
    /// Maximum distance between block time and a transaction deadline (ms).
    pub max_transaction_lifetime: u64,
    /// Lowest accepted entity version.
    pub min_entity_version: u8,
    /// Highest accepted entity version.
    pub max_entity_version: u8,
    /// Maximum transfer message size in bytes.
    pub max_message_size: usize,
    /// Maximum mosaics carried by one transfer.
    pub max_mosaics_per_transfer: usize,
    /// Maximum hash lock duration (blocks).
    pub max_hash_lock_duration: BlockDuration,
    /// Maximum secret lock duration (blocks).
    pub max_secret_lock_duration: BlockDuration,
    /// Mosaic required as hash lock collateral.
    pub currency_mosaic_id: MosaicId,
    /// Exact collateral amount for a hash lock.
    pub lock_funds_amount: Amount,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            network: NetworkIdentifier::Testnet,
            max_transaction_lifetime: 24 * 60 * 60 * 1000, // 24 hours
            min_entity_version: 1,
            max_entity_version: 1,
            max_message_size: 1024,
            max_mosaics_per_transfer: 10,
            max_hash_lock_duration: 5_760,    // ~2 days of 30s blocks
            max_secret_lock_duration: 86_400, // ~30 days of 30s blocks
            currency_mosaic_id: 0x6BED_913F_A202_23F8,
            lock_funds_amount: 10_000_000,
        }
    }
}

impl ValidationConfig {
    /// Load from `QC_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| std::env::var(variable).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            network: parse_var(&lookup, "QC_NETWORK", defaults.network)?,
            max_transaction_lifetime: parse_var(
                &lookup,
                "QC_MAX_TRANSACTION_LIFETIME",
                defaults.max_transaction_lifetime,
            )?,
            min_entity_version: parse_var(
                &lookup,
                "QC_MIN_ENTITY_VERSION",
                defaults.min_entity_version,
            )?,
            max_entity_version: parse_var(
                &lookup,
                "QC_MAX_ENTITY_VERSION",
                defaults.max_entity_version,
            )?,
            max_message_size: parse_var(&lookup, "QC_MAX_MESSAGE_SIZE", defaults.max_message_size)?,
            max_mosaics_per_transfer: parse_var(
                &lookup,
                "QC_MAX_MOSAICS_PER_TRANSFER",
                defaults.max_mosaics_per_transfer,
            )?,
            max_hash_lock_duration: parse_var(
                &lookup,
                "QC_MAX_HASH_LOCK_DURATION",
                defaults.max_hash_lock_duration,
            )?,
            max_secret_lock_duration: parse_var(
                &lookup,
                "QC_MAX_SECRET_LOCK_DURATION",
                defaults.max_secret_lock_duration,
            )?,
            currency_mosaic_id: parse_var(
                &lookup,
                "QC_CURRENCY_MOSAIC_ID",
                defaults.currency_mosaic_id,
            )?,
            lock_funds_amount: parse_var(
                &lookup,
                "QC_LOCK_FUNDS_AMOUNT",
                defaults.lock_funds_amount,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_entity_version > self.max_entity_version {
            return Err(ConfigError::InvalidValue {
                field: "min_entity_version",
                reason: format!(
                    "{} exceeds max_entity_version {}",
                    self.min_entity_version, self.max_entity_version
                ),
            });
        }

        let nonzero = [
            ("max_transaction_lifetime", self.max_transaction_lifetime),
            ("max_mosaics_per_transfer", self.max_mosaics_per_transfer as u64),
            ("max_hash_lock_duration", self.max_hash_lock_duration),
            ("max_secret_lock_duration", self.max_secret_lock_duration),
            ("lock_funds_amount", self.lock_funds_amount),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn with_network(mut self, network: NetworkIdentifier) -> Self {
        self.network = network;
        self
    }

    pub fn with_max_transaction_lifetime(mut self, lifetime: u64) -> Self {
        self.max_transaction_lifetime = lifetime;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    pub fn with_max_mosaics_per_transfer(mut self, count: usize) -> Self {
        self.max_mosaics_per_transfer = count;
        self
    }

    /// Sets the required hash lock collateral.
    pub fn with_lock_funds(mut self, mosaic_id: MosaicId, amount: Amount) -> Self {
        self.currency_mosaic_id = mosaic_id;
        self.lock_funds_amount = amount;
        self
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    variable: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(variable) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Environment {
            variable,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
