//! Raw and normalized gesture types plus the gesture error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single 3D hand keypoint as reported by the tracker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "LandmarkRepr")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Wire shapes accepted for a landmark: tracker objects or bare triples.
#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkRepr {
    Object {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
    },
    Triple([f32; 3]),
}

impl From<LandmarkRepr> for Landmark {
    fn from(value: LandmarkRepr) -> Self {
        match value {
            LandmarkRepr::Object { x, y, z } => Landmark { x, y, z },
            LandmarkRepr::Triple([x, y, z]) => Landmark { x, y, z },
        }
    }
}

/// One captured frame: an ordered set of landmarks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct LandmarkFrame(pub Vec<Landmark>);

impl LandmarkFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Landmark>> for LandmarkFrame {
    fn from(points: Vec<Landmark>) -> Self {
        Self(points)
    }
}

/// A raw gesture capture, frames in capture order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct GestureSequence(pub Vec<LandmarkFrame>);

impl GestureSequence {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self(frames)
    }

    /// Parse the browser capture format: an array of frames, each an array of
    /// `{x, y, z}` objects or `[x, y, z]` triples.
    pub fn from_json(json: &str) -> Result<Self, GestureError> {
        serde_json::from_str(json).map_err(|err| GestureError::Malformed(err.to_string()))
    }

    pub fn frames(&self) -> &[LandmarkFrame] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply a uniform scale and translation to every landmark.
    #[cfg(test)]
    pub(crate) fn transformed(&self, scale: f32, offset: [f32; 3]) -> Self {
        let frames = self
            .0
            .iter()
            .map(|frame| {
                LandmarkFrame::new(
                    frame
                        .0
                        .iter()
                        .map(|p| {
                            Landmark::new(
                                p.x * scale + offset[0],
                                p.y * scale + offset[1],
                                p.z * scale + offset[2],
                            )
                        })
                        .collect(),
                )
            })
            .collect();
        Self(frames)
    }
}

impl From<Vec<Vec<[f32; 3]>>> for GestureSequence {
    fn from(frames: Vec<Vec<[f32; 3]>>) -> Self {
        Self(
            frames
                .into_iter()
                .map(|frame| {
                    LandmarkFrame::new(
                        frame
                            .into_iter()
                            .map(|[x, y, z]| Landmark::new(x, y, z))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Translation- and scale-invariant gesture, one flat coordinate vector per
/// frame (`[x0, y0, z0, x1, y1, z1, ...]`).
///
/// Only [`crate::GestureNormalizer`] produces these from raw captures; the
/// serde impls exist so stored templates can be reloaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct NormalizedGestureSequence {
    frames: Vec<Vec<f32>>,
}

impl NormalizedGestureSequence {
    pub(crate) fn from_frames(frames: Vec<Vec<f32>>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Vec<f32>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Width shared by every frame, or an error if the sequence is empty or ragged.
    pub fn frame_width(&self) -> Result<usize, GestureError> {
        let first = self.frames.first().ok_or(GestureError::EmptySequence)?;
        let width = first.len();
        if width == 0 {
            return Err(GestureError::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if let Some(bad) = self.frames.iter().find(|f| f.len() != width) {
            return Err(GestureError::DimensionMismatch {
                expected: width,
                actual: bad.len(),
            });
        }
        Ok(width)
    }
}

/// Errors raised while parsing, normalizing or comparing gestures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GestureError {
    #[error("gesture sequence contains no frames")]
    EmptySequence,

    #[error("frame {frame} has {actual} landmarks; expected {expected}")]
    FrameShape {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    #[error("frame {frame} contains a non-finite coordinate")]
    NonFiniteCoordinate { frame: usize },

    #[error("frame {frame} has a degenerate scale reference")]
    DegenerateFrame { frame: usize },

    #[error("normalized frame width mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("malformed gesture payload: {0}")]
    Malformed(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
