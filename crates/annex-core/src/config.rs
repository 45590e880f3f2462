//! `annex` Configuration Module
//!
//! Provides configuration file support via `annex.toml`, environment variables,
//! and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (API, CLI flags)
//! 2. Environment variables (`ANNEX_*`)
//! 3. Configuration file (`annex.toml`)
//! 4. Default values

use crate::index::{
    HnswParams, SearchWidth, DEFAULT_EF_CONSTRUCTION, DEFAULT_EF_SEARCH, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_INSERT_CONNECTIONS, DEFAULT_NORMALIZATION_FACTOR, HNSW_MAX_M,
};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// HNSW construction section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswConfig {
    /// Neighbor cap above layer 0 (M); layer 0 allows `2 * M`.
    pub max_connections: usize,
    /// Neighbors a new node links to on each layer.
    pub max_insert_connections: usize,
    /// Candidate list size while linking.
    pub ef_construction: usize,
    /// Level multiplier for layer sampling.
    pub normalization_factor: f64,
    /// Fixed RNG seed for reproducible graphs (`None` = OS entropy).
    pub seed: Option<u64>,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_insert_connections: DEFAULT_MAX_INSERT_CONNECTIONS,
            ef_construction: DEFAULT_EF_CONSTRUCTION,
            normalization_factor: DEFAULT_NORMALIZATION_FACTOR,
            seed: None,
        }
    }
}

/// Query section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base layer-0 beam width.
    pub ef_search: usize,
    /// Whether the requested limit may widen the beam.
    pub width: SearchWidth,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ef_search: DEFAULT_EF_SEARCH,
            width: SearchWidth::default(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or json.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main `annex` configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnnexConfig {
    /// HNSW construction configuration.
    pub hnsw: HnswConfig,
    /// Query configuration.
    pub search: SearchConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl AnnexConfig {
    /// Loads configuration from `annex.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("annex.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ANNEX_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_m = HNSW_MAX_M / 2;
        if !(1..=max_m).contains(&self.hnsw.max_connections) {
            return Err(ConfigError::InvalidValue {
                key: "hnsw.max_connections".to_string(),
                message: format!(
                    "value {} is out of range [1, {max_m}]",
                    self.hnsw.max_connections
                ),
            });
        }

        if !(1..=HNSW_MAX_M).contains(&self.hnsw.max_insert_connections) {
            return Err(ConfigError::InvalidValue {
                key: "hnsw.max_insert_connections".to_string(),
                message: format!(
                    "value {} is out of range [1, {HNSW_MAX_M}]",
                    self.hnsw.max_insert_connections
                ),
            });
        }

        if !(1..=HNSW_MAX_M).contains(&self.hnsw.ef_construction) {
            return Err(ConfigError::InvalidValue {
                key: "hnsw.ef_construction".to_string(),
                message: format!(
                    "value {} is out of range [1, {HNSW_MAX_M}]",
                    self.hnsw.ef_construction
                ),
            });
        }

        let factor = self.hnsw.normalization_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "hnsw.normalization_factor".to_string(),
                message: format!("value {factor} must be a positive finite number"),
            });
        }

        if !(1..=HNSW_MAX_M).contains(&self.search.ef_search) {
            return Err(ConfigError::InvalidValue {
                key: "search.ef_search".to_string(),
                message: format!(
                    "value {} is out of range [1, {HNSW_MAX_M}]",
                    self.search.ef_search
                ),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }

    /// Index parameters described by the `[hnsw]` and `[search]` sections.
    #[must_use]
    pub fn hnsw_params(&self) -> HnswParams {
        HnswParams {
            max_connections: self.hnsw.max_connections,
            max_insert_connections: self.hnsw.max_insert_connections,
            ef_construction: self.hnsw.ef_construction,
            ef_search: self.search.ef_search,
            search_width: self.search.width,
            normalization_factor: self.hnsw.normalization_factor,
        }
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
