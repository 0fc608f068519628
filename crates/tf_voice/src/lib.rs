//! # Trifactor Voice (`tf_voice`)
//!
//! Voice-identity factor. Speaker embeddings arrive pre-extracted from an
//! external model; this crate only validates and compares them.
//!
//! [`EmbeddingComparator`] scores two [`VoiceEmbedding`]s with cosine
//! similarity and accepts when the score reaches the configured threshold.
//! The score is symmetric and deterministic.

pub mod comparator;
pub mod embedding;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::comparator::EmbeddingComparator;
pub use crate::embedding::VoiceEmbedding;

/// Embedding dimension and acceptance threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Dimension produced by the deployed embedding model.
    pub dimension: usize,
    /// Minimum cosine similarity for a match, in `[-1.0, 1.0]`.
    pub threshold: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            dimension: 192,
            threshold: 0.82,
        }
    }
}

impl VoiceConfig {
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.version == 0 {
            return Err(VoiceError::InvalidConfig("voice.version must be >= 1".into()));
        }
        if self.dimension == 0 {
            return Err(VoiceError::InvalidConfig(
                "voice.dimension must be >= 1".into(),
            ));
        }
        if !(self.threshold >= -1.0 && self.threshold <= 1.0) {
            return Err(VoiceError::InvalidConfig(
                "voice.threshold must be between -1.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}

/// Errors raised while validating or comparing embeddings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("voice embedding is empty")]
    Empty,

    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("embedding has dimension {actual}; expected {expected}")]
    UnexpectedDimension { expected: usize, actual: usize },

    #[error("voice embedding contains a non-finite value")]
    NonFinite,

    #[error("malformed voice embedding: {0}")]
    Malformed(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
