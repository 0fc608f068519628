//! # Trifactor Gesture (`tf_gesture`)
//!
//! Hand-gesture factor of the trifactor verification engine.
//!
//! - [`GestureSequence`] is a raw capture: frames of 3D landmarks as the
//!   browser-side hand tracker reports them.
//! - [`GestureNormalizer`] turns a raw capture into a
//!   [`NormalizedGestureSequence`] that no longer depends on where the hand
//!   was in the image or how far it was from the camera.
//! - [`GestureMatcher`] aligns two normalized sequences and applies the
//!   per-frame tolerance plus aggregate agreement policy.
//!
//! ```
//! use tf_gesture::{
//!     GestureMatchConfig, GestureMatcher, GestureNormalizer, GestureSequence, NormalizeConfig,
//! };
//!
//! let cfg = NormalizeConfig {
//!     landmark_count: 2,
//!     scale_from: 0,
//!     scale_to: 1,
//!     ..Default::default()
//! };
//! let normalizer = GestureNormalizer::new(cfg).unwrap();
//! let matcher = GestureMatcher::new(GestureMatchConfig::default()).unwrap();
//!
//! let near = GestureSequence::from_json("[[[0,0,0],[0,2,0]]]").unwrap();
//! let far = GestureSequence::from_json("[[[5,5,0],[5,6,0]]]").unwrap();
//!
//! let a = normalizer.normalize(&near).unwrap();
//! let b = normalizer.normalize(&far).unwrap();
//! assert!(matcher.matches(&a, &b));
//! ```

pub mod matcher;
pub mod normalize;
pub mod types;

pub use crate::matcher::{GestureComparison, GestureMatchConfig, GestureMatcher};
pub use crate::normalize::{GestureNormalizer, NormalizeConfig, HAND_LANDMARK_COUNT};
pub use crate::types::{
    GestureError, GestureSequence, Landmark, LandmarkFrame, NormalizedGestureSequence,
};
