use std::sync::Arc;
use std::time::Instant;

use tf_passphrase::PassphraseMatcher;
use tf_voice::EmbeddingComparator;
use tracing::{info, warn, Level};

use crate::metrics::VerifyMetrics;
use crate::stages::{GestureCheck, GestureStage, PassphraseCheck, VoiceCheck};
use crate::store::TemplateStore;
use crate::types::{
    EnrollError, EnrollRequest, MatchAttempt, MatchResult, Stage, UserTemplate, VerifyConfig,
    VerifyError,
};

/// Longest accepted username, in bytes.
pub const MAX_USERNAME_LEN: usize = 64;

/// Enrollment and verification orchestrator.
///
/// Holds only read-only stage configuration, so one instance can be shared
/// across threads behind an `Arc` and every call is a pure function of its
/// arguments.
pub struct Verifier<P = PassphraseMatcher, G = GestureStage, V = EmbeddingComparator> {
    passphrase: P,
    gesture: G,
    voice: V,
    metrics: Option<Arc<dyn VerifyMetrics>>,
}

impl Verifier {
    /// Build the default three-stage verifier, validating every config.
    pub fn new(cfg: VerifyConfig) -> Result<Self, VerifyError> {
        let passphrase = PassphraseMatcher::new(cfg.passphrase)
            .map_err(|err| VerifyError::InvalidConfig(err.to_string()))?;
        let gesture = GestureStage::from_configs(cfg.landmarks, cfg.gesture)
            .map_err(|err| VerifyError::InvalidConfig(err.to_string()))?;
        let voice = EmbeddingComparator::new(cfg.voice)
            .map_err(|err| VerifyError::InvalidConfig(err.to_string()))?;
        Ok(Self::from_stages(passphrase, gesture, voice))
    }
}

impl<P, G, V> Verifier<P, G, V>
where
    P: PassphraseCheck,
    G: GestureCheck,
    V: VoiceCheck,
{
    pub fn from_stages(passphrase: P, gesture: G, voice: V) -> Self {
        Self {
            passphrase,
            gesture,
            voice,
            metrics: None,
        }
    }

    /// Attach a metrics observer.
    pub fn with_metrics(mut self, metrics: Arc<dyn VerifyMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn passphrase_stage(&self) -> &P {
        &self.passphrase
    }

    pub fn gesture_stage(&self) -> &G {
        &self.gesture
    }

    pub fn voice_stage(&self) -> &V {
        &self.voice
    }

    /// Build a template for a new user.
    ///
    /// Rejects usernames already present in `store`, then normalizes the
    /// gesture and validates the voice embedding. The store is only read;
    /// persisting the template is the caller's job (see
    /// [`Verifier::enroll_and_store`]).
    pub fn enroll(
        &self,
        store: &dyn TemplateStore,
        request: EnrollRequest,
    ) -> Result<UserTemplate, EnrollError> {
        let start = Instant::now();
        let username = request.username.clone();
        let span = tracing::span!(Level::INFO, "tf_verify.enroll", username = %username);
        let _guard = span.enter();

        let result = self.enroll_inner(store, request);
        self.finish_enroll(&username, start, result)
    }

    /// [`Verifier::enroll`] followed by an atomic insert-if-absent. A
    /// concurrent enrollment that wins the insert race surfaces as
    /// [`EnrollError::DuplicateUser`].
    pub fn enroll_and_store(
        &self,
        store: &dyn TemplateStore,
        request: EnrollRequest,
    ) -> Result<UserTemplate, EnrollError> {
        let start = Instant::now();
        let username = request.username.clone();
        let span = tracing::span!(Level::INFO, "tf_verify.enroll", username = %username);
        let _guard = span.enter();

        let result = self.enroll_inner(store, request).and_then(|template| {
            store.insert_if_absent(template.clone())?;
            Ok(template)
        });
        self.finish_enroll(&username, start, result)
    }

    /// Steps 2-4 of enrollment without the duplicate check.
    pub fn build_template(&self, request: EnrollRequest) -> Result<UserTemplate, EnrollError> {
        validate_username(&request.username)?;
        self.assemble_template(request)
    }

    /// Template assembly for a username that has already been validated.
    fn assemble_template(&self, request: EnrollRequest) -> Result<UserTemplate, EnrollError> {
        let EnrollRequest {
            username,
            passphrase_text,
            gesture,
            voice_embedding,
        } = request;

        if passphrase_text.trim().is_empty() {
            return Err(EnrollError::InvalidPassphrase);
        }

        let gesture_template = self
            .gesture
            .normalize(&gesture)
            .map_err(EnrollError::InvalidGesture)?;
        self.voice
            .validate(&voice_embedding)
            .map_err(EnrollError::InvalidVoiceSample)?;

        Ok(UserTemplate {
            username,
            passphrase_text,
            gesture_template,
            voice_embedding_template: voice_embedding,
        })
    }

    fn enroll_inner(
        &self,
        store: &dyn TemplateStore,
        request: EnrollRequest,
    ) -> Result<UserTemplate, EnrollError> {
        validate_username(&request.username)?;
        if store.contains(&request.username)? {
            return Err(EnrollError::DuplicateUser(request.username));
        }
        self.assemble_template(request)
    }

    fn finish_enroll(
        &self,
        username: &str,
        start: Instant,
        result: Result<UserTemplate, EnrollError>,
    ) -> Result<UserTemplate, EnrollError> {
        match &result {
            Ok(template) => info!(
                gesture_frames = template.gesture_template.len(),
                voice_dim = template.voice_embedding_template.dim(),
                elapsed_micros = start.elapsed().as_micros(),
                "enroll_success"
            ),
            Err(err) => warn!(error = %err, "enroll_failure"),
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_enroll(username, result.as_ref().map(|_| ()), start.elapsed());
        }
        result
    }

    /// Check an attempt against a template.
    ///
    /// Stages run in a fixed order and stop at the first failure:
    /// passphrase, then gesture, then voice. Every malformed input is a
    /// rejection at the stage that consumes it. A template enrolled under a
    /// different username rejects at the passphrase stage without consulting
    /// any matcher.
    pub fn verify(&self, attempt: &MatchAttempt, template: &UserTemplate) -> MatchResult {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "tf_verify.verify",
            username = %attempt.username
        );
        let _guard = span.enter();

        let result = self.run_stages(attempt, template);

        match result.failed_stage() {
            None => info!(
                elapsed_micros = start.elapsed().as_micros(),
                "verify_accepted"
            ),
            Some(stage) => info!(
                stage = stage.as_str(),
                elapsed_micros = start.elapsed().as_micros(),
                "verify_rejected"
            ),
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_verify(&attempt.username, &result, start.elapsed());
        }
        result
    }

    fn run_stages(&self, attempt: &MatchAttempt, template: &UserTemplate) -> MatchResult {
        // A template belonging to someone else can never vouch for the attempt.
        if attempt.username != template.username {
            warn!(
                template_username = %template.username,
                "verify_template_username_mismatch"
            );
            return MatchResult::rejected(Stage::Passphrase);
        }

        if !self
            .passphrase
            .check(&attempt.passphrase_input, &template.passphrase_text)
        {
            return MatchResult::rejected(Stage::Passphrase);
        }

        let gesture = match self.gesture.normalize(&attempt.gesture_input) {
            Ok(gesture) => gesture,
            Err(err) => {
                warn!(error = %err, "verify_gesture_unusable");
                return MatchResult::rejected(Stage::Gesture);
            }
        };
        if !self.gesture.check(&gesture, &template.gesture_template) {
            return MatchResult::rejected(Stage::Gesture);
        }

        match self.voice.check(
            &attempt.voice_embedding_input,
            &template.voice_embedding_template,
        ) {
            Ok(true) => MatchResult::accepted(),
            Ok(false) => MatchResult::rejected(Stage::Voice),
            Err(err) => {
                warn!(error = %err, "verify_voice_unusable");
                MatchResult::rejected(Stage::Voice)
            }
        }
    }

    /// Look up the attempt's username in `store` and verify against it.
    pub fn verify_user(
        &self,
        store: &dyn TemplateStore,
        attempt: &MatchAttempt,
    ) -> Result<MatchResult, VerifyError> {
        let template = store
            .get(&attempt.username)?
            .ok_or_else(|| VerifyError::UnknownUser(attempt.username.clone()))?;
        Ok(self.verify(attempt, &template))
    }
}

/// Usernames become file and key names in the calling layer, so only a
/// conservative character set is allowed.
pub fn validate_username(username: &str) -> Result<(), EnrollError> {
    if username.is_empty() {
        return Err(EnrollError::InvalidUsername(
            "username cannot be empty".into(),
        ));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(EnrollError::InvalidUsername(format!(
            "username longer than {MAX_USERNAME_LEN} bytes"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(EnrollError::InvalidUsername(
            "username may only contain letters, digits, '_', '-' and '.'".into(),
        ));
    }
    if username.starts_with('.') {
        return Err(EnrollError::InvalidUsername(
            "username cannot start with '.'".into(),
        ));
    }
    Ok(())
}
