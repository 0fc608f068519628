//! Landmark normalization.
//!
//! Every frame is re-expressed relative to an anchor landmark and divided by
//! a per-frame size reference, so the same hand pose captured nearer to or
//! farther from the camera, or at a different spot in the image, produces the
//! same coordinates. Normalization is a pure function of `(sequence, config)`.

use serde::{Deserialize, Serialize};

use crate::types::{GestureError, GestureSequence, Landmark, NormalizedGestureSequence};

/// Number of keypoints in a MediaPipe hand skeleton.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmark layout and size reference used by [`GestureNormalizer`].
///
/// Defaults follow the MediaPipe hand model: landmark 0 is the wrist and
/// landmark 9 is the middle-finger MCP joint, whose distance from the wrist is
/// stable across finger poses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Configuration schema version. Bump on any change that alters output.
    pub version: u32,
    /// Landmarks every frame must contain.
    pub landmark_count: usize,
    /// Landmark moved to the origin.
    pub anchor_index: usize,
    /// First endpoint of the size reference segment.
    pub scale_from: usize,
    /// Second endpoint of the size reference segment.
    pub scale_to: usize,
    /// Reference lengths at or below this are treated as degenerate frames.
    pub min_scale: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            landmark_count: HAND_LANDMARK_COUNT,
            anchor_index: 0,
            scale_from: 0,
            scale_to: 9,
            min_scale: 1e-6,
        }
    }
}

impl NormalizeConfig {
    pub fn validate(&self) -> Result<(), GestureError> {
        if self.version == 0 {
            return Err(GestureError::InvalidConfig(
                "landmarks.version must be >= 1".into(),
            ));
        }
        if self.landmark_count == 0 {
            return Err(GestureError::InvalidConfig(
                "landmarks.landmark_count must be >= 1".into(),
            ));
        }
        for (name, idx) in [
            ("anchor_index", self.anchor_index),
            ("scale_from", self.scale_from),
            ("scale_to", self.scale_to),
        ] {
            if idx >= self.landmark_count {
                return Err(GestureError::InvalidConfig(format!(
                    "landmarks.{name} ({idx}) must be < landmark_count ({})",
                    self.landmark_count
                )));
            }
        }
        if self.scale_from == self.scale_to {
            return Err(GestureError::InvalidConfig(
                "landmarks.scale_from and scale_to must differ".into(),
            ));
        }
        if !(self.min_scale.is_finite() && self.min_scale >= 0.0) {
            return Err(GestureError::InvalidConfig(
                "landmarks.min_scale must be a finite value >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Converts raw captures into comparison-ready [`NormalizedGestureSequence`]s.
#[derive(Debug, Clone)]
pub struct GestureNormalizer {
    cfg: NormalizeConfig,
}

impl GestureNormalizer {
    pub fn new(cfg: NormalizeConfig) -> Result<Self, GestureError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.cfg
    }

    /// Normalize every frame, preserving frame order.
    ///
    /// Fails on the first frame with the wrong landmark count, a non-finite
    /// coordinate, or a collapsed size reference.
    pub fn normalize(
        &self,
        raw: &GestureSequence,
    ) -> Result<NormalizedGestureSequence, GestureError> {
        if raw.is_empty() {
            return Err(GestureError::EmptySequence);
        }

        let frames = raw
            .frames()
            .iter()
            .enumerate()
            .map(|(idx, frame)| self.normalize_frame(idx, frame.points()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NormalizedGestureSequence::from_frames(frames))
    }

    fn normalize_frame(&self, idx: usize, points: &[Landmark]) -> Result<Vec<f32>, GestureError> {
        if points.len() != self.cfg.landmark_count {
            return Err(GestureError::FrameShape {
                frame: idx,
                expected: self.cfg.landmark_count,
                actual: points.len(),
            });
        }
        if !points.iter().all(Landmark::is_finite) {
            return Err(GestureError::NonFiniteCoordinate { frame: idx });
        }

        let anchor = points[self.cfg.anchor_index];
        let scale = distance(&points[self.cfg.scale_from], &points[self.cfg.scale_to]);
        if !scale.is_finite() || scale <= self.cfg.min_scale as f64 {
            return Err(GestureError::DegenerateFrame { frame: idx });
        }

        let mut out = Vec::with_capacity(points.len() * 3);
        for p in points {
            out.push(((p.x as f64 - anchor.x as f64) / scale) as f32);
            out.push(((p.y as f64 - anchor.y as f64) / scale) as f32);
            out.push(((p.z as f64 - anchor.z as f64) / scale) as f32);
        }
        // A tiny reference with a far-away landmark overflows f32.
        if !out.iter().all(|v| v.is_finite()) {
            return Err(GestureError::DegenerateFrame { frame: idx });
        }
        Ok(out)
    }
}

fn distance(a: &Landmark, b: &Landmark) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    let dz = a.z as f64 - b.z as f64;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LandmarkFrame;
    use proptest::prelude::*;

    fn small_cfg() -> NormalizeConfig {
        NormalizeConfig {
            landmark_count: 3,
            anchor_index: 0,
            scale_from: 0,
            scale_to: 1,
            ..Default::default()
        }
    }

    fn frame(points: &[[f32; 3]]) -> LandmarkFrame {
        points.iter().map(|&[x, y, z]| Landmark::new(x, y, z)).collect::<Vec<_>>().into()
    }

    #[test]
    fn anchor_becomes_origin_and_reference_has_unit_length() {
        let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
        let seq = GestureSequence::new(vec![frame(&[
            [1.0, 1.0, 1.0],
            [1.0, 3.0, 1.0],
            [2.0, 1.0, 1.0],
        ])]);

        let out = normalizer.normalize(&seq).unwrap();
        assert_eq!(out.frames()[0], vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn frame_with_wrong_landmark_count_is_rejected() {
        let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
        let seq = GestureSequence::new(vec![
            frame(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            frame(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]),
        ]);

        assert_eq!(
            normalizer.normalize(&seq),
            Err(GestureError::FrameShape {
                frame: 1,
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
        assert_eq!(
            normalizer.normalize(&GestureSequence::default()),
            Err(GestureError::EmptySequence)
        );
    }

    #[test]
    fn collapsed_reference_is_degenerate() {
        let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
        let seq = GestureSequence::new(vec![frame(&[
            [0.5, 0.5, 0.0],
            [0.5, 0.5, 0.0],
            [0.9, 0.1, 0.0],
        ])]);
        assert_eq!(
            normalizer.normalize(&seq),
            Err(GestureError::DegenerateFrame { frame: 0 })
        );
    }

    #[test]
    fn overflowing_output_is_degenerate() {
        let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
        let seq = GestureSequence::new(vec![
            frame(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            frame(&[[0.0, 0.0, 0.0], [1e-5, 0.0, 0.0], [1e34, 0.0, 0.0]]),
        ]);
        assert_eq!(
            normalizer.normalize(&seq),
            Err(GestureError::DegenerateFrame { frame: 1 })
        );
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
        let seq = GestureSequence::new(vec![frame(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, f32::NAN],
            [0.0, 1.0, 0.0],
        ])]);
        assert_eq!(
            normalizer.normalize(&seq),
            Err(GestureError::NonFiniteCoordinate { frame: 0 })
        );
    }

    #[test]
    fn config_indices_must_fit_the_skeleton() {
        let cfg = NormalizeConfig {
            scale_to: 21,
            ..Default::default()
        };
        let err = GestureNormalizer::new(cfg).unwrap_err();
        assert!(err.to_string().contains("scale_to"));

        let cfg = NormalizeConfig {
            scale_from: 4,
            scale_to: 4,
            ..Default::default()
        };
        assert!(GestureNormalizer::new(cfg).is_err());
    }

    proptest! {
        #[test]
        fn translation_and_scale_do_not_change_output(
            points in prop::collection::vec(
                prop::array::uniform3(-1.0f32..1.0), 3..=3),
            scale in 0.2f32..5.0,
            dx in -10.0f32..10.0,
            dy in -10.0f32..10.0,
            dz in -10.0f32..10.0,
        ) {
            let reference = {
                let a = points[0];
                let b = points[1];
                ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
            };
            prop_assume!(reference > 0.2);

            let normalizer = GestureNormalizer::new(small_cfg()).unwrap();
            let seq = GestureSequence::new(vec![frame(&points)]);
            let moved = seq.transformed(scale, [dx, dy, dz]);

            let a = normalizer.normalize(&seq).unwrap();
            let b = normalizer.normalize(&moved).unwrap();
            for (x, y) in a.frames()[0].iter().zip(b.frames()[0].iter()) {
                prop_assert!((x - y).abs() <= 1e-3 * (1.0 + x.abs()), "{x} vs {y}");
            }
        }
    }
}
