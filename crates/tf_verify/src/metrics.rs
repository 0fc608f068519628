// Metrics hooks for the `tf_verify` crate.
//
// A `VerifyMetrics` observer is handed to `Verifier::with_metrics` at
// construction; every enroll and verify call then reports its outcome and
// wall-clock latency. Observers see results after they are final and cannot
// influence them.
use std::time::Duration;

use crate::types::{EnrollError, MatchResult};

/// Metrics observer for enrollment and verification.
pub trait VerifyMetrics: Send + Sync {
    /// Record a completed verification. `result.failed_stage()` tells which
    /// stage short-circuited a rejection.
    fn record_verify(&self, username: &str, result: &MatchResult, latency: Duration);

    /// Record a completed enrollment attempt.
    fn record_enroll(&self, username: &str, result: Result<(), &EnrollError>, latency: Duration);
}
