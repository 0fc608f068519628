//! # Trifactor Verify (`tf_verify`)
//!
//! ## Purpose
//!
//! `tf_verify` ties the three factor crates together. It builds stored
//! templates at enrollment time and runs the short-circuiting check at login
//! time:
//!
//! 1. passphrase (`tf_passphrase`), case-insensitive exact match
//! 2. gesture (`tf_gesture`), normalized landmark sequence alignment
//! 3. voice (`tf_voice`), cosine similarity of speaker embeddings
//!
//! The first failing factor decides the result; later factors are never
//! evaluated.
//!
//! ## Core Types
//!
//! - [`Verifier`]: the orchestrator. Generic over [`PassphraseCheck`],
//!   [`GestureCheck`] and [`VoiceCheck`] so any stage can be swapped.
//! - [`EnrollRequest`] / [`UserTemplate`]: enrollment input and stored output.
//! - [`MatchAttempt`] / [`MatchResult`]: login input and the decision.
//! - [`TemplateStore`]: where templates live between enrollment and login.
//!   [`InMemoryTemplateStore`] is the bundled implementation.
//!
//! ## Example Usage
//!
//! ```
//! use tf_verify::{InMemoryTemplateStore, Stage, Verifier, VerifyConfig};
//! use tf_verify::demo_utils::{attempt, enroll_request};
//!
//! let mut cfg = VerifyConfig::default();
//! cfg.voice.dimension = 16;
//! let verifier = Verifier::new(cfg).unwrap();
//! let store = InMemoryTemplateStore::new();
//!
//! let template = verifier
//!     .enroll_and_store(&store, enroll_request("alice", "open sesame", 1, 16))
//!     .unwrap();
//!
//! let ok = verifier.verify(&attempt("alice", "OPEN SESAME", 1, 16), &template);
//! assert!(ok.is_accepted());
//!
//! let bad = verifier.verify(&attempt("alice", "open sesame!", 1, 16), &template);
//! assert_eq!(bad.failed_stage(), Some(Stage::Passphrase));
//! ```
//!
//! ## Observability
//!
//! Every call runs inside a `tf_verify.enroll` or `tf_verify.verify` span
//! carrying the username. Outcomes are logged as `enroll_success`,
//! `enroll_failure`, `verify_accepted` and `verify_rejected` events; the
//! rejecting stage is a structured field. Callers that want counters attach
//! a [`VerifyMetrics`] observer with [`Verifier::with_metrics`].

pub mod engine;
pub mod metrics;
pub mod stages;
pub mod store;
pub mod types;

#[doc(hidden)]
pub mod demo_utils;

pub use crate::engine::{validate_username, Verifier, MAX_USERNAME_LEN};
pub use crate::metrics::VerifyMetrics;
pub use crate::stages::{GestureCheck, GestureStage, PassphraseCheck, VoiceCheck};
pub use crate::store::{InMemoryTemplateStore, StoreError, TemplateStore};
pub use crate::types::{
    EnrollError, EnrollRequest, MatchAttempt, MatchResult, Outcome, Stage, UserTemplate,
    VerifyConfig, VerifyError,
};
