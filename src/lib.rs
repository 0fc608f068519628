//! Workspace umbrella crate for Trifactor three-factor verification.
//!
//! Re-exports the factor crates and the orchestrator so callers depend on a
//! single crate, and adds YAML configuration loading on top.
//!
//! ```
//! use trifactor::{InMemoryTemplateStore, TrifactorConfig};
//! use trifactor::demo_utils::{attempt, enroll_request};
//!
//! let cfg = TrifactorConfig::from_yaml("version: \"1.0\"\nvoice:\n  dimension: 32\n").unwrap();
//! let verifier = cfg.build_verifier().unwrap();
//! let store = InMemoryTemplateStore::new();
//!
//! verifier
//!     .enroll_and_store(&store, enroll_request("alice", "open sesame", 1, 32))
//!     .unwrap();
//! let result = verifier
//!     .verify_user(&store, &attempt("alice", "Open Sesame", 1, 32))
//!     .unwrap();
//! assert!(result.is_accepted());
//! ```

pub mod config;

pub use config::{ConfigLoadError, LoggingYamlConfig, TrifactorConfig};

pub use tf_gesture::{
    GestureComparison, GestureError, GestureMatchConfig, GestureMatcher, GestureNormalizer,
    GestureSequence, HAND_LANDMARK_COUNT, Landmark, LandmarkFrame, NormalizeConfig,
    NormalizedGestureSequence,
};
pub use tf_passphrase::{PassphraseConfig, PassphraseError, PassphraseMatcher};
pub use tf_verify::{
    EnrollError, EnrollRequest, GestureCheck, GestureStage, InMemoryTemplateStore,
    MAX_USERNAME_LEN, MatchAttempt, MatchResult, Outcome, PassphraseCheck, Stage, StoreError,
    TemplateStore, UserTemplate, Verifier, VerifyConfig, VerifyError, VerifyMetrics, VoiceCheck,
    validate_username,
};
pub use tf_voice::{EmbeddingComparator, VoiceConfig, VoiceEmbedding, VoiceError};

#[doc(hidden)]
pub use tf_verify::demo_utils;
