//! Tolerance-based comparison of normalized gesture sequences.
//!
//! Two thresholds apply: a frame pair is *close* when the Euclidean distance
//! between its flattened coordinates is within `frame_tolerance`, and the
//! sequences match when the share of close frames reaches
//! `frame_agreement_ratio`. Sequences of different length are aligned first
//! by uniformly sampling the longer one down to the shorter one's length.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{GestureError, NormalizedGestureSequence};

/// Calibrated thresholds for [`GestureMatcher`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureMatchConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Maximum per-frame Euclidean distance for a frame pair to count as close.
    pub frame_tolerance: f32,
    /// Minimum fraction of close frames, in `(0.0, 1.0]`.
    pub frame_agreement_ratio: f32,
}

impl Default for GestureMatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            frame_tolerance: 0.5,
            frame_agreement_ratio: 0.9,
        }
    }
}

impl GestureMatchConfig {
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.version == 0 {
            return Err(GestureError::InvalidConfig(
                "gesture.version must be >= 1".into(),
            ));
        }
        if !(self.frame_tolerance.is_finite() && self.frame_tolerance >= 0.0) {
            return Err(GestureError::InvalidConfig(
                "gesture.frame_tolerance must be a finite value >= 0".into(),
            ));
        }
        if !(self.frame_agreement_ratio > 0.0 && self.frame_agreement_ratio <= 1.0) {
            return Err(GestureError::InvalidConfig(
                "gesture.frame_agreement_ratio must be in (0.0, 1.0]".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of aligning and comparing two sequences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GestureComparison {
    /// Frame pairs compared after alignment (the shorter sequence's length).
    pub compared_frames: usize,
    /// Frame pairs within `frame_tolerance`.
    pub close_frames: usize,
    /// `close_frames / compared_frames`.
    pub agreement: f32,
    pub accepted: bool,
}

#[derive(Debug, Clone)]
pub struct GestureMatcher {
    cfg: GestureMatchConfig,
}

impl GestureMatcher {
    pub fn new(cfg: GestureMatchConfig) -> Result<Self, GestureError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &GestureMatchConfig {
        &self.cfg
    }

    /// Align and compare, reporting malformed inputs as errors.
    pub fn compare(
        &self,
        input: &NormalizedGestureSequence,
        template: &NormalizedGestureSequence,
    ) -> Result<GestureComparison, GestureError> {
        let width = template.frame_width()?;
        let input_width = input.frame_width()?;
        if input_width != width {
            return Err(GestureError::DimensionMismatch {
                expected: width,
                actual: input_width,
            });
        }

        let target = input.len().min(template.len());
        let lhs = resample(input.frames(), target);
        let rhs = resample(template.frames(), target);

        let close_frames = lhs
            .iter()
            .zip(rhs.iter())
            .filter(|(a, b)| euclidean(a, b) <= self.cfg.frame_tolerance as f64)
            .count();
        let agreement = close_frames as f32 / target as f32;
        let accepted = agreement >= self.cfg.frame_agreement_ratio;

        debug!(
            input_frames = input.len(),
            template_frames = template.len(),
            compared_frames = target,
            close_frames,
            agreement,
            accepted,
            "gesture_compare"
        );

        Ok(GestureComparison {
            compared_frames: target,
            close_frames,
            agreement,
            accepted,
        })
    }

    /// Match decision. Malformed inputs are a rejection, never an error.
    pub fn matches(
        &self,
        input: &NormalizedGestureSequence,
        template: &NormalizedGestureSequence,
    ) -> bool {
        match self.compare(input, template) {
            Ok(cmp) => cmp.accepted,
            Err(err) => {
                debug!(error = %err, "gesture_compare_rejected_malformed");
                false
            }
        }
    }
}

/// Uniform index sampling of `frames` down to `target` frames.
///
/// First and last frames are always kept when `target >= 2`; a sequence that
/// is already `target` long is returned unchanged.
fn resample(frames: &[Vec<f32>], target: usize) -> Vec<&[f32]> {
    let len = frames.len();
    if target == 0 || len == 0 {
        return Vec::new();
    }
    if target >= len {
        return frames.iter().map(Vec::as_slice).collect();
    }
    if target == 1 {
        return vec![frames[0].as_slice()];
    }
    (0..target)
        .map(|i| {
            let src = (i * (len - 1) + (target - 1) / 2) / (target - 1);
            frames[src.min(len - 1)].as_slice()
        })
        .collect()
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(frames: Vec<Vec<f32>>) -> NormalizedGestureSequence {
        NormalizedGestureSequence::from_frames(frames)
    }

    fn matcher(tolerance: f32, ratio: f32) -> GestureMatcher {
        GestureMatcher::new(GestureMatchConfig {
            frame_tolerance: tolerance,
            frame_agreement_ratio: ratio,
            ..Default::default()
        })
        .unwrap()
    }

    fn ramp(frames: usize) -> Vec<Vec<f32>> {
        (0..frames).map(|i| vec![i as f32, 0.0, 1.0]).collect()
    }

    #[test]
    fn identical_sequences_match() {
        let m = matcher(0.1, 0.9);
        let a = seq(ramp(10));
        let cmp = m.compare(&a, &a).unwrap();
        assert_eq!(cmp.close_frames, 10);
        assert!(cmp.accepted);
        assert!(m.matches(&a, &a));
    }

    #[test]
    fn isolated_noisy_frame_is_tolerated() {
        let m = matcher(0.1, 0.9);
        let template = seq(ramp(10));
        let mut noisy = ramp(10);
        noisy[4][1] += 5.0;
        let cmp = m.compare(&seq(noisy), &template).unwrap();
        assert_eq!(cmp.close_frames, 9);
        assert!(cmp.accepted);
    }

    #[test]
    fn systematic_difference_is_rejected() {
        let m = matcher(0.1, 0.9);
        let template = seq(ramp(10));
        let mut shifted = ramp(10);
        for frame in shifted.iter_mut().step_by(2) {
            frame[2] += 1.0;
        }
        assert!(!m.matches(&seq(shifted), &template));
    }

    #[test]
    fn longer_input_is_resampled_to_template_length() {
        let m = matcher(0.01, 1.0);
        // 19 frames at half steps; every other frame lines up with the template.
        let template = seq((0..10).map(|i| vec![i as f32]).collect());
        let input = seq((0..19).map(|i| vec![i as f32 * 0.5]).collect());
        let cmp = m.compare(&input, &template).unwrap();
        assert_eq!(cmp.compared_frames, 10);
        assert!(cmp.accepted);
    }

    #[test]
    fn longer_template_is_resampled_to_input_length() {
        let m = matcher(0.01, 1.0);
        let template = seq((0..19).map(|i| vec![i as f32 * 0.5]).collect());
        let input = seq((0..10).map(|i| vec![i as f32]).collect());
        assert!(m.matches(&input, &template));
    }

    #[test]
    fn resample_keeps_endpoints_and_order() {
        let frames: Vec<Vec<f32>> = (0..7).map(|i| vec![i as f32]).collect();
        let picked: Vec<f32> = resample(&frames, 4).iter().map(|f| f[0]).collect();
        assert_eq!(picked, vec![0.0, 2.0, 4.0, 6.0]);

        let single: Vec<f32> = resample(&frames, 1).iter().map(|f| f[0]).collect();
        assert_eq!(single, vec![0.0]);

        assert_eq!(resample(&frames, 7).len(), 7);
    }

    #[test]
    fn malformed_inputs_fail_closed() {
        let m = matcher(10.0, 0.5);
        let good = seq(ramp(3));
        assert!(!m.matches(&seq(Vec::new()), &good));
        assert!(!m.matches(&good, &seq(Vec::new())));
        assert!(!m.matches(&seq(vec![vec![0.0, 0.0]; 3]), &good));
        assert!(!m.matches(&seq(vec![vec![0.0; 3], vec![0.0; 2]]), &good));
        assert!(matches!(
            m.compare(&seq(vec![vec![0.0, 0.0]; 3]), &good),
            Err(GestureError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let m = GestureMatcher::new(GestureMatchConfig::default()).unwrap();
        let a = seq(ramp(12));
        let b = seq(ramp(9));
        let first = m.compare(&a, &b).unwrap();
        for _ in 0..5 {
            assert_eq!(m.compare(&a, &b).unwrap(), first);
        }
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        assert!(GestureMatcher::new(GestureMatchConfig {
            frame_agreement_ratio: 0.0,
            ..Default::default()
        })
        .is_err());
        assert!(GestureMatcher::new(GestureMatchConfig {
            frame_tolerance: f32::NAN,
            ..Default::default()
        })
        .is_err());
    }
}
