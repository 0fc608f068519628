use serde::{Deserialize, Serialize};

use crate::VoiceError;

/// Fixed-dimension speaker embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct VoiceEmbedding(Vec<f32>);

impl VoiceEmbedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Parse a JSON number array, as stored alongside a template.
    pub fn from_json(json: &str) -> Result<Self, VoiceError> {
        serde_json::from_str(json).map_err(|err| VoiceError::Malformed(err.to_string()))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    pub(crate) fn check_finite(&self) -> Result<(), VoiceError> {
        if self.0.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(VoiceError::NonFinite)
        }
    }

    /// Unit-length copy. A zero vector is returned unchanged.
    pub fn l2_normalized(&self) -> Self {
        let mut values = self.0.clone();
        let norm = values.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            for x in values.iter_mut() {
                *x = (*x as f64 * inv) as f32;
            }
        }
        Self(values)
    }

    /// Element-wise mean of several utterance embeddings, for callers that
    /// enroll from more than one recording.
    pub fn average(samples: &[VoiceEmbedding]) -> Result<Self, VoiceError> {
        let first = samples.first().ok_or(VoiceError::Empty)?;
        let dim = first.dim();
        if dim == 0 {
            return Err(VoiceError::Empty);
        }

        let mut sum = vec![0.0f64; dim];
        for sample in samples {
            if sample.dim() != dim {
                return Err(VoiceError::DimensionMismatch {
                    left: dim,
                    right: sample.dim(),
                });
            }
            sample.check_finite()?;
            for (acc, v) in sum.iter_mut().zip(sample.as_slice()) {
                *acc += *v as f64;
            }
        }

        let count = samples.len() as f64;
        Ok(Self(sum.into_iter().map(|v| (v / count) as f32).collect()))
    }
}

impl From<Vec<f32>> for VoiceEmbedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}
