//! Synthetic captures shared by tests, benches and the demo binary.

use tf_gesture::{GestureSequence, Landmark, LandmarkFrame, HAND_LANDMARK_COUNT};
use tf_voice::VoiceEmbedding;

use crate::types::{EnrollRequest, MatchAttempt};

/// A 21-landmark hand whose fingertips drift along x over `frames` frames,
/// scaled by `scale` and shifted by `offset` as if captured at a different
/// camera distance and position.
pub fn synthetic_hand_sequence(frames: usize, scale: f32, offset: [f32; 3]) -> GestureSequence {
    GestureSequence::new(
        (0..frames)
            .map(|t| {
                LandmarkFrame::new(
                    (0..HAND_LANDMARK_COUNT)
                        .map(|i| {
                            let fi = i as f32;
                            let mut x = 0.1 * (fi / 20.0) * (0.3 * fi).cos();
                            let y = 0.05 * fi;
                            let z = 0.02 * (0.7 * fi).sin();
                            if i % 4 == 0 && i > 0 {
                                x += 0.002 * t as f32;
                            }
                            Landmark::new(
                                x * scale + offset[0],
                                y * scale + offset[1],
                                z * scale + offset[2],
                            )
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Displace the fingertips of the listed frames by `amount` along x.
pub fn tamper_frames(seq: &GestureSequence, frames: &[usize], amount: f32) -> GestureSequence {
    GestureSequence::new(
        seq.frames()
            .iter()
            .enumerate()
            .map(|(t, frame)| {
                if !frames.contains(&t) {
                    return frame.clone();
                }
                LandmarkFrame::new(
                    frame
                        .points()
                        .iter()
                        .enumerate()
                        .map(|(i, p)| {
                            if i % 4 == 0 && i > 0 {
                                Landmark::new(p.x + amount, p.y, p.z)
                            } else {
                                *p
                            }
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Deterministic pseudo-speaker embedding of dimension `dim`.
pub fn synthetic_voice(seed: u32, dim: usize) -> VoiceEmbedding {
    VoiceEmbedding::new(
        (0..dim)
            .map(|i| ((i as f32 + 1.0) * (seed as f32 + 1.0) * 0.618).sin())
            .collect(),
    )
}

pub fn enroll_request(username: &str, phrase: &str, voice_seed: u32, dim: usize) -> EnrollRequest {
    EnrollRequest {
        username: username.into(),
        passphrase_text: phrase.into(),
        gesture: synthetic_hand_sequence(20, 1.0, [0.4, 0.3, 0.0]),
        voice_embedding: synthetic_voice(voice_seed, dim),
    }
}

pub fn attempt(username: &str, phrase: &str, voice_seed: u32, dim: usize) -> MatchAttempt {
    MatchAttempt {
        username: username.into(),
        passphrase_input: phrase.into(),
        gesture_input: synthetic_hand_sequence(20, 1.0, [0.4, 0.3, 0.0]),
        voice_embedding_input: synthetic_voice(voice_seed, dim),
    }
}
