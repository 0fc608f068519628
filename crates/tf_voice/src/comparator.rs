use tracing::debug;

use crate::{VoiceConfig, VoiceEmbedding, VoiceError};

/// Cosine-similarity comparator with a fixed acceptance threshold.
#[derive(Debug, Clone)]
pub struct EmbeddingComparator {
    cfg: VoiceConfig,
}

impl EmbeddingComparator {
    pub fn new(cfg: VoiceConfig) -> Result<Self, VoiceError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.cfg
    }

    pub fn expected_dimension(&self) -> usize {
        self.cfg.dimension
    }

    /// Check an embedding against the deployment's model dimension.
    pub fn validate(&self, embedding: &VoiceEmbedding) -> Result<(), VoiceError> {
        if embedding.is_empty() {
            return Err(VoiceError::Empty);
        }
        if embedding.dim() != self.cfg.dimension {
            return Err(VoiceError::UnexpectedDimension {
                expected: self.cfg.dimension,
                actual: embedding.dim(),
            });
        }
        embedding.check_finite()
    }

    /// Cosine similarity in `[-1.0, 1.0]`; `0.0` when either vector has zero norm.
    ///
    /// Accumulation runs index by index in `f64`, so swapping the operands
    /// yields a bit-identical score.
    pub fn similarity(&self, a: &VoiceEmbedding, b: &VoiceEmbedding) -> Result<f32, VoiceError> {
        if a.is_empty() || b.is_empty() {
            return Err(VoiceError::Empty);
        }
        if a.dim() != b.dim() {
            return Err(VoiceError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }
        a.check_finite()?;
        b.check_finite()?;

        Ok(cosine_similarity(a.as_slice(), b.as_slice()))
    }

    /// Accept when the similarity reaches the threshold.
    pub fn matches(&self, a: &VoiceEmbedding, b: &VoiceEmbedding) -> Result<bool, VoiceError> {
        let score = self.similarity(a, b)?;
        let accepted = score >= self.cfg.threshold;
        debug!(
            score,
            threshold = self.cfg.threshold,
            accepted,
            "voice_compare"
        );
        Ok(accepted)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}
