//! YAML Configuration File Support for Trifactor
//!
//! Loads every stage's calibrated constants from a single YAML document so a
//! deployment can tune thresholds without rebuilding. Any section left out
//! falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # Trifactor verification configuration
//! version: "1.0"
//! name: "kiosk-eu"
//!
//! landmarks:
//!   version: 1
//!   landmark_count: 21
//!   anchor_index: 0
//!   scale_from: 0
//!   scale_to: 9
//!
//! gesture:
//!   version: 1
//!   frame_tolerance: 0.5
//!   frame_agreement_ratio: 0.9
//!
//! voice:
//!   version: 1
//!   dimension: 192
//!   threshold: 0.82
//!
//! passphrase:
//!   version: 1
//!   normalize_unicode: true
//!
//! logging:
//!   filter: "info,tf_verify=debug"
//!   json: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tf_gesture::{GestureMatchConfig, NormalizeConfig};
use tf_passphrase::PassphraseConfig;
use tf_verify::{Verifier, VerifyConfig, VerifyError};
use tf_voice::VoiceConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the verification engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrifactorConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Gesture normalization (anchor and scale landmarks)
    #[serde(default)]
    pub landmarks: NormalizeConfig,

    /// Gesture matching thresholds
    #[serde(default)]
    pub gesture: GestureMatchConfig,

    /// Voice embedding dimension and similarity threshold
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Passphrase comparison
    #[serde(default)]
    pub passphrase: PassphraseConfig,

    /// Log output of the binary
    #[serde(default)]
    pub logging: LoggingYamlConfig,
}

impl TrifactorConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: TrifactorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.landmarks.validate().map_err(validation)?;
        self.gesture.validate().map_err(validation)?;
        self.voice.validate().map_err(validation)?;
        self.passphrase.validate().map_err(validation)?;
        self.logging.validate()?;

        Ok(())
    }

    /// Stage configuration handed to [`Verifier::new`].
    pub fn verify_config(&self) -> VerifyConfig {
        VerifyConfig {
            landmarks: self.landmarks.clone(),
            gesture: self.gesture.clone(),
            voice: self.voice.clone(),
            passphrase: self.passphrase.clone(),
        }
    }

    pub fn build_verifier(&self) -> Result<Verifier, VerifyError> {
        Verifier::new(self.verify_config())
    }
}

impl Default for TrifactorConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            landmarks: NormalizeConfig::default(),
            gesture: GestureMatchConfig::default(),
            voice: VoiceConfig::default(),
            passphrase: PassphraseConfig::default(),
            logging: LoggingYamlConfig::default(),
        }
    }
}

fn validation<E: std::fmt::Display>(err: E) -> ConfigLoadError {
    ConfigLoadError::Validation(err.to_string())
}

/// Logging YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingYamlConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.filter.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
