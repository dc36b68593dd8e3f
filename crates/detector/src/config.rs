// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Detector Configuration
//!
//! [`DetectorConfig`] is loaded from YAML (`.yaml`/`.yml`) or JSON (`.json`).
//! Every field is optional in the file; missing fields take their defaults.
//!
//! ## Example
//!
//! ```rust
//! use sqlscope_detector::DetectorConfig;
//! use sqlscope_ir::Dialect;
//! use sqlscope_rules::Severity;
//!
//! let config = DetectorConfig::from_yaml_str(
//!     "dialect: postgresql\nmin_severity: medium\ndisabled_rules: [SQL-PERF-001]\n",
//! )
//! .unwrap();
//! assert_eq!(config.dialect, Dialect::PostgreSQL);
//! assert_eq!(config.min_severity, Severity::Medium);
//! assert!(config.is_disabled("SQL-PERF-001"));
//! assert_eq!(config.timeout_ms, 5_000);
//! ```

use serde::{Deserialize, Serialize};
use sqlscope_ir::Dialect;
use sqlscope_rules::Severity;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is not one of `yaml`, `yml`, `json`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Detector settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Dialect used when the caller does not pass one
    pub dialect: Dialect,

    /// Rule ids that never run
    pub disabled_rules: BTreeSet<String>,

    /// Issues below this severity are dropped
    pub min_severity: Severity,

    /// Per-input deadline for batch analysis
    pub timeout_ms: u64,

    /// Longest `matched_text` an issue carries
    pub max_matched_text: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Generic,
            disabled_rules: BTreeSet::new(),
            min_severity: Severity::Info,
            timeout_ms: 5_000,
            max_matched_text: 200,
        }
    }
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file, picking the format by extension
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty YAML document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "timeout_ms must be > 0".to_string(),
            });
        }
        if self.max_matched_text == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_matched_text must be > 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn with_disabled_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.disabled_rules.insert(rule_id.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn is_disabled(&self, rule_id: &str) -> bool {
        self.disabled_rules.contains(rule_id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
