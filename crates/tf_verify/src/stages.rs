//! Stage traits the [`crate::Verifier`] is generic over, with the concrete
//! matchers as their default implementations.

use tf_gesture::{
    GestureError, GestureMatchConfig, GestureMatcher, GestureNormalizer, GestureSequence,
    NormalizeConfig, NormalizedGestureSequence,
};
use tf_passphrase::PassphraseMatcher;
use tf_voice::{EmbeddingComparator, VoiceEmbedding, VoiceError};

pub trait PassphraseCheck: Send + Sync {
    fn check(&self, input: &str, template: &str) -> bool;
}

pub trait GestureCheck: Send + Sync {
    fn normalize(&self, raw: &GestureSequence) -> Result<NormalizedGestureSequence, GestureError>;

    fn check(&self, input: &NormalizedGestureSequence, template: &NormalizedGestureSequence)
        -> bool;
}

pub trait VoiceCheck: Send + Sync {
    /// Enrollment-time validation against the deployment's model dimension.
    fn validate(&self, embedding: &VoiceEmbedding) -> Result<(), VoiceError>;

    fn check(&self, input: &VoiceEmbedding, template: &VoiceEmbedding) -> Result<bool, VoiceError>;
}

impl PassphraseCheck for PassphraseMatcher {
    fn check(&self, input: &str, template: &str) -> bool {
        self.matches(input, template)
    }
}

/// Normalizer and matcher paired into one stage.
#[derive(Debug, Clone)]
pub struct GestureStage {
    normalizer: GestureNormalizer,
    matcher: GestureMatcher,
}

impl GestureStage {
    pub fn new(normalizer: GestureNormalizer, matcher: GestureMatcher) -> Self {
        Self {
            normalizer,
            matcher,
        }
    }

    pub fn from_configs(
        landmarks: NormalizeConfig,
        gesture: GestureMatchConfig,
    ) -> Result<Self, GestureError> {
        Ok(Self::new(
            GestureNormalizer::new(landmarks)?,
            GestureMatcher::new(gesture)?,
        ))
    }

    pub fn normalizer(&self) -> &GestureNormalizer {
        &self.normalizer
    }

    pub fn matcher(&self) -> &GestureMatcher {
        &self.matcher
    }
}

impl GestureCheck for GestureStage {
    fn normalize(&self, raw: &GestureSequence) -> Result<NormalizedGestureSequence, GestureError> {
        self.normalizer.normalize(raw)
    }

    fn check(
        &self,
        input: &NormalizedGestureSequence,
        template: &NormalizedGestureSequence,
    ) -> bool {
        self.matcher.matches(input, template)
    }
}

impl VoiceCheck for EmbeddingComparator {
    fn validate(&self, embedding: &VoiceEmbedding) -> Result<(), VoiceError> {
        EmbeddingComparator::validate(self, embedding)
    }

    /// Both operands must have the deployment's dimension, not merely agree
    /// with each other.
    fn check(&self, input: &VoiceEmbedding, template: &VoiceEmbedding) -> Result<bool, VoiceError> {
        EmbeddingComparator::validate(self, input)?;
        EmbeddingComparator::validate(self, template)?;
        self.matches(input, template)
    }
}
