//! Pose frame model: timestamped, confidence-scored body keypoints
//! delivered by the external pose source, plus per-limb wrist tracking
//! that feeds the swipe recognizer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ---- keypoint indices (MoveNet-style single-pose, 17 total) ----

pub const NOSE: usize = 0;
pub const LEFT_EYE: usize = 1;
pub const RIGHT_EYE: usize = 2;
pub const LEFT_EAR: usize = 3;
pub const RIGHT_EAR: usize = 4;
pub const LEFT_SHOULDER: usize = 5;
pub const RIGHT_SHOULDER: usize = 6;
pub const LEFT_ELBOW: usize = 7;
pub const RIGHT_ELBOW: usize = 8;
pub const LEFT_WRIST: usize = 9;
pub const RIGHT_WRIST: usize = 10;
pub const LEFT_HIP: usize = 11;
pub const RIGHT_HIP: usize = 12;
pub const LEFT_KNEE: usize = 13;
pub const RIGHT_KNEE: usize = 14;
pub const LEFT_ANKLE: usize = 15;
pub const RIGHT_ANKLE: usize = 16;

/// Keypoints per frame.
pub const KEYPOINT_COUNT: usize = 17;
/// Floats per keypoint on the wire: x, y, confidence score.
pub const KEYPOINT_FLOATS: usize = 3;
/// Total floats in a flat pose frame array.
pub const POSE_FRAME_FLOATS: usize = KEYPOINT_COUNT * KEYPOINT_FLOATS;

/// The two tracked extremities, each mapped to a game channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limb {
    Left,
    Right,
}

pub const BOTH_LIMBS: [Limb; 2] = [Limb::Left, Limb::Right];

impl Limb {
    /// Index of this limb's wrist keypoint.
    pub fn wrist_index(self) -> usize {
        match self {
            Limb::Left => LEFT_WRIST,
            Limb::Right => RIGHT_WRIST,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Limb::Left => 0,
            Limb::Right => 1,
        }
    }

    pub fn from_index(idx: u8) -> Limb {
        if idx == 0 {
            Limb::Left
        } else {
            Limb::Right
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Limb::Left => "left",
            Limb::Right => "right",
        }
    }
}

/// A single detected body keypoint in world pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub pos: Vec2,
    /// Model confidence in [0, 1]. Low scores mean the point was guessed.
    pub score: f32,
}

/// One frame from the pose source: every keypoint plus the capture timestamp.
///
/// Capture timestamps are host wall times and are used only to measure the
/// elapsed time between consecutive frames for velocity; all game-facing
/// times run on the pausable game clock.
#[derive(Debug, Clone)]
pub struct PoseFrame {
    pub captured_at_ms: f64,
    pub keypoints: [Keypoint; KEYPOINT_COUNT],
}

impl PoseFrame {
    /// Build a frame from the host's flat array of x/y/score triples in
    /// keypoint-index order. Returns None if the length is wrong.
    pub fn from_flat(data: &[f32], captured_at_ms: f64) -> Option<PoseFrame> {
        if data.len() != POSE_FRAME_FLOATS {
            return None;
        }
        let mut keypoints = [Keypoint::default(); KEYPOINT_COUNT];
        for (i, kp) in keypoints.iter_mut().enumerate() {
            *kp = Keypoint {
                pos: Vec2::new(data[i * KEYPOINT_FLOATS], data[i * KEYPOINT_FLOATS + 1]),
                score: data[i * KEYPOINT_FLOATS + 2],
            };
        }
        Some(PoseFrame {
            captured_at_ms,
            keypoints,
        })
    }

    pub fn keypoint(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }

    pub fn wrist(&self, limb: Limb) -> &Keypoint {
        &self.keypoints[limb.wrist_index()]
    }

    /// The wrist keypoint if its confidence clears the floor, else None.
    /// A low-confidence wrist is "not observed", not an error.
    pub fn observed_wrist(&self, limb: Limb, min_score: f32) -> Option<&Keypoint> {
        let kp = self.wrist(limb);
        if kp.score >= min_score {
            Some(kp)
        } else {
            None
        }
    }
}

/// A wrist observation that cleared the confidence floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WristSample {
    pub pos: Vec2,
    pub captured_at_ms: f64,
}

/// Two-slot wrist history per limb.
///
/// Swipes are only ever computed from two *consecutive* observed frames:
/// a frame where a wrist is absent or under the confidence floor clears
/// that limb's slot, and a pair never spans the gap.
#[derive(Debug, Clone, Default)]
pub struct LimbTracker {
    last: [Option<WristSample>; 2],
}

impl LimbTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's observation for one limb. Returns the
    /// (previous, current) pair when two consecutive frames observed it.
    pub fn observe(
        &mut self,
        limb: Limb,
        sample: Option<WristSample>,
    ) -> Option<(WristSample, WristSample)> {
        let slot = &mut self.last[limb.index() as usize];
        match sample {
            Some(curr) => {
                let pair = slot.map(|prev| (prev, curr));
                *slot = Some(curr);
                pair
            }
            None => {
                *slot = None;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = [None, None];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(left_wrist: (f32, f32, f32), right_wrist: (f32, f32, f32)) -> Vec<f32> {
        let mut data = vec![0.0; POSE_FRAME_FLOATS];
        data[LEFT_WRIST * 3] = left_wrist.0;
        data[LEFT_WRIST * 3 + 1] = left_wrist.1;
        data[LEFT_WRIST * 3 + 2] = left_wrist.2;
        data[RIGHT_WRIST * 3] = right_wrist.0;
        data[RIGHT_WRIST * 3 + 1] = right_wrist.1;
        data[RIGHT_WRIST * 3 + 2] = right_wrist.2;
        data
    }

    #[test]
    fn from_flat_rejects_wrong_length() {
        assert!(PoseFrame::from_flat(&[0.0; 50], 0.0).is_none());
        assert!(PoseFrame::from_flat(&[], 0.0).is_none());
        assert!(PoseFrame::from_flat(&[0.0; POSE_FRAME_FLOATS], 0.0).is_some());
    }

    #[test]
    fn wrists_map_to_their_keypoints() {
        let data = flat_frame((100.0, 200.0, 0.9), (300.0, 400.0, 0.8));
        let frame = PoseFrame::from_flat(&data, 12.0).unwrap();
        assert_eq!(frame.wrist(Limb::Left).pos, Vec2::new(100.0, 200.0));
        assert_eq!(frame.wrist(Limb::Right).pos, Vec2::new(300.0, 400.0));
        assert_eq!(frame.captured_at_ms, 12.0);
    }

    #[test]
    fn confidence_floor_gates_observation() {
        let data = flat_frame((100.0, 200.0, 0.9), (300.0, 400.0, 0.3));
        let frame = PoseFrame::from_flat(&data, 0.0).unwrap();
        assert!(frame.observed_wrist(Limb::Left, 0.5).is_some());
        assert!(frame.observed_wrist(Limb::Right, 0.5).is_none());
        // the floor itself passes
        assert!(frame.observed_wrist(Limb::Right, 0.3).is_some());
    }

    #[test]
    fn tracker_pairs_consecutive_observations() {
        let mut tracker = LimbTracker::new();
        let a = WristSample { pos: Vec2::new(0.0, 0.0), captured_at_ms: 100.0 };
        let b = WristSample { pos: Vec2::new(10.0, 0.0), captured_at_ms: 116.0 };

        assert_eq!(tracker.observe(Limb::Left, Some(a)), None);
        assert_eq!(tracker.observe(Limb::Left, Some(b)), Some((a, b)));
    }

    #[test]
    fn tracker_gap_breaks_pairing() {
        let mut tracker = LimbTracker::new();
        let a = WristSample { pos: Vec2::new(0.0, 0.0), captured_at_ms: 100.0 };
        let b = WristSample { pos: Vec2::new(500.0, 0.0), captured_at_ms: 400.0 };

        tracker.observe(Limb::Right, Some(a));
        tracker.observe(Limb::Right, None); // occluded frame
        // First observation after the gap has no partner.
        assert_eq!(tracker.observe(Limb::Right, Some(b)), None);
    }

    #[test]
    fn tracker_limbs_are_independent() {
        let mut tracker = LimbTracker::new();
        let a = WristSample { pos: Vec2::new(0.0, 0.0), captured_at_ms: 100.0 };
        let b = WristSample { pos: Vec2::new(5.0, 5.0), captured_at_ms: 116.0 };

        tracker.observe(Limb::Left, Some(a));
        assert_eq!(tracker.observe(Limb::Right, Some(b)), None);
        assert!(tracker.observe(Limb::Left, Some(b)).is_some());
    }
}
