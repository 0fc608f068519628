use serde::{Deserialize, Serialize};
use thiserror::Error;

use tf_gesture::{
    GestureError, GestureMatchConfig, GestureSequence, NormalizeConfig, NormalizedGestureSequence,
};
use tf_passphrase::PassphraseConfig;
use tf_voice::{VoiceConfig, VoiceEmbedding, VoiceError};

use crate::store::StoreError;

/// Calibrated constants for every stage. Read-only once a [`crate::Verifier`]
/// is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VerifyConfig {
    pub landmarks: NormalizeConfig,
    pub gesture: GestureMatchConfig,
    pub voice: VoiceConfig,
    pub passphrase: PassphraseConfig,
}

/// Enrolled reference data for one user.
///
/// Built once by [`crate::Verifier::enroll`] and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserTemplate {
    pub username: String,
    pub passphrase_text: String,
    pub gesture_template: NormalizedGestureSequence,
    pub voice_embedding_template: VoiceEmbedding,
}

impl UserTemplate {
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|err| StoreError::Serialization(err.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|err| StoreError::Serialization(err.to_string()))
    }
}

/// Enrollment input as collected by the calling layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrollRequest {
    pub username: String,
    pub passphrase_text: String,
    pub gesture: GestureSequence,
    pub voice_embedding: VoiceEmbedding,
}

/// One login attempt. Lives only for the duration of a verify call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchAttempt {
    pub username: String,
    pub passphrase_input: String,
    pub gesture_input: GestureSequence,
    pub voice_embedding_input: VoiceEmbedding,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
}

/// Verification stages in evaluation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Passphrase,
    Gesture,
    Voice,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Passphrase => "passphrase",
            Stage::Gesture => "gesture",
            Stage::Voice => "voice",
        }
    }
}

/// Verification outcome. Only the two constructors exist, so an accepted
/// result never carries a failed stage and a rejected one always does.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct MatchResult {
    outcome: Outcome,
    failed_stage: Option<Stage>,
}

impl MatchResult {
    pub fn accepted() -> Self {
        Self {
            outcome: Outcome::Accepted,
            failed_stage: None,
        }
    }

    pub fn rejected(stage: Stage) -> Self {
        Self {
            outcome: Outcome::Rejected,
            failed_stage: Some(stage),
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        self.failed_stage
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnrollError {
    #[error("user '{0}' is already enrolled")]
    DuplicateUser(String),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("passphrase transcript is blank")]
    InvalidPassphrase,

    #[error("invalid gesture: {0}")]
    InvalidGesture(#[from] GestureError),

    #[error("invalid voice sample: {0}")]
    InvalidVoiceSample(#[from] VoiceError),

    #[error("template store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EnrollError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(username) => EnrollError::DuplicateUser(username),
            other => EnrollError::Store(other),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerifyError {
    #[error("no template enrolled for user '{0}'")]
    UnknownUser(String),

    #[error("template store failure: {0}")]
    Store(#[from] StoreError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_result_serializes_outcome_and_stage() {
        let json = serde_json::to_value(MatchResult::rejected(Stage::Gesture)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcome": "rejected", "failed_stage": "gesture"})
        );

        let json = serde_json::to_value(MatchResult::accepted()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcome": "accepted", "failed_stage": null})
        );
    }

    #[test]
    fn duplicate_store_error_maps_to_duplicate_user() {
        let err: EnrollError = StoreError::Duplicate("alice".into()).into();
        assert_eq!(err, EnrollError::DuplicateUser("alice".into()));

        let err: EnrollError = StoreError::Backend("poisoned lock".into()).into();
        assert!(matches!(err, EnrollError::Store(_)));
    }

    #[test]
    fn malformed_template_json_is_a_store_error() {
        assert!(matches!(
            UserTemplate::from_json("{\"username\": 3}"),
            Err(StoreError::Serialization(_))
        ));
    }
}
