//! # Trifactor Passphrase (`tf_passphrase`)
//!
//! The spoken passphrase is checked as a hard gate: the transcript must equal
//! the enrolled phrase ignoring case. Whitespace is compared exactly and no
//! fuzzy matching is applied.
//!
//! ```
//! use tf_passphrase::{PassphraseConfig, PassphraseMatcher};
//!
//! let matcher = PassphraseMatcher::new(PassphraseConfig::default()).unwrap();
//! assert!(matcher.matches("Open Sesame", "open sesame"));
//! assert!(!matcher.matches("open  sesame", "open sesame"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PassphraseConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Apply Unicode NFC before case folding so composed and decomposed
    /// spellings of the same phrase compare equal.
    pub normalize_unicode: bool,
}

impl Default for PassphraseConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PassphraseError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}

impl PassphraseConfig {
    pub fn validate(&self) -> Result<(), PassphraseError> {
        if self.version == 0 {
            return Err(PassphraseError::InvalidConfigVersion {
                version: self.version,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PassphraseMatcher {
    cfg: PassphraseConfig,
}

impl PassphraseMatcher {
    pub fn new(cfg: PassphraseConfig) -> Result<Self, PassphraseError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &PassphraseConfig {
        &self.cfg
    }

    /// Comparison form of a phrase: optionally NFC-normalized, then lowercased.
    pub fn fold(&self, phrase: &str) -> String {
        if self.cfg.normalize_unicode {
            phrase.nfc().collect::<String>().to_lowercase()
        } else {
            phrase.to_lowercase()
        }
    }

    pub fn matches(&self, input: &str, template: &str) -> bool {
        self.fold(input) == self.fold(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PassphraseMatcher {
        PassphraseMatcher::new(PassphraseConfig::default()).unwrap()
    }

    #[test]
    fn case_is_ignored() {
        let m = matcher();
        assert!(m.matches("Open Sesame", "open sesame"));
        assert!(m.matches("OPEN SESAME", "Open Sesame"));
    }

    #[test]
    fn whitespace_is_exact() {
        let m = matcher();
        assert!(!m.matches("open sesame ", "open sesame"));
        assert!(!m.matches(" open sesame", "open sesame"));
        assert!(!m.matches("open\tsesame", "open sesame"));
        assert!(!m.matches("opensesame", "open sesame"));
    }

    #[test]
    fn different_words_do_not_match() {
        let m = matcher();
        assert!(!m.matches("open sesamee", "open sesame"));
        assert!(!m.matches("Unclear", "open sesame"));
    }

    #[test]
    fn composed_and_decomposed_forms_match_when_normalizing() {
        let composed = "caf\u{e9} au lait";
        let decomposed = "cafe\u{301} au lait";
        assert!(matcher().matches(composed, decomposed));

        let raw = PassphraseMatcher::new(PassphraseConfig {
            normalize_unicode: false,
            ..Default::default()
        })
        .unwrap();
        assert!(!raw.matches(composed, decomposed));
    }

    #[test]
    fn non_ascii_case_folding() {
        assert!(matcher().matches("ÜBER STRASSE", "über strasse"));
    }

    #[test]
    fn zero_version_is_rejected() {
        let err = PassphraseMatcher::new(PassphraseConfig {
            version: 0,
            normalize_unicode: true,
        })
        .unwrap_err();
        assert_eq!(err, PassphraseError::InvalidConfigVersion { version: 0 });
    }
}
