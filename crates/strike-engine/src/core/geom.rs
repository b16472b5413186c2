// core/geom.rs
//
// Pure geometry and kinematics helpers for swipe detection.
// No dependencies on engine state, just math.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

/// Duration of one reference frame at 60 Hz, in milliseconds.
/// Swipe velocities are expressed in world units per reference frame so that
/// thresholds keep their meaning when the pose source runs at a different cadence.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// The eight compass directions a swipe or target can take, named in screen
/// terms for a y-down coordinate space (`Up` points toward the top of the canvas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction8 {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

/// Directions in counter-clockwise order starting at `Right`, matching the
/// 45°-sector index produced by `Direction8::from_vector`.
pub const ALL_DIRECTIONS: [Direction8; 8] = [
    Direction8::Right,
    Direction8::UpRight,
    Direction8::Up,
    Direction8::UpLeft,
    Direction8::Left,
    Direction8::DownLeft,
    Direction8::Down,
    Direction8::DownRight,
];

impl Direction8 {
    /// Bucket a displacement vector into one of eight 45°-wide sectors centered
    /// on the cardinal/diagonal axes. Returns None for a zero-length vector.
    ///
    /// The input is in screen coordinates (y grows downward); an upward swipe
    /// therefore has negative `y` and maps to `Up`.
    pub fn from_vector(v: Vec2) -> Option<Direction8> {
        if v.length_squared() < f32::EPSILON {
            return None;
        }
        // Flip y so the angle follows the usual math convention, then snap to
        // the nearest 45° sector. rem_euclid folds the -4..=4 range onto 0..8.
        let angle = (-v.y).atan2(v.x);
        let sector = (angle / FRAC_PI_4).round() as i32;
        Some(ALL_DIRECTIONS[sector.rem_euclid(8) as usize])
    }

    /// Sector index in [0, 8), counter-clockwise from `Right`.
    pub fn index(self) -> u8 {
        match self {
            Direction8::Right => 0,
            Direction8::UpRight => 1,
            Direction8::Up => 2,
            Direction8::UpLeft => 3,
            Direction8::Left => 4,
            Direction8::DownLeft => 5,
            Direction8::Down => 6,
            Direction8::DownRight => 7,
        }
    }

    /// Inverse of `index`. Out-of-range values wrap.
    pub fn from_index(idx: u8) -> Direction8 {
        ALL_DIRECTIONS[(idx % 8) as usize]
    }

    /// Unit vector for this direction in screen coordinates (y-down).
    pub fn as_vector(self) -> Vec2 {
        let angle = self.index() as f32 * FRAC_PI_4;
        Vec2::new(angle.cos(), -angle.sin())
    }

    /// Short label for logs and debug overlays.
    pub fn label(self) -> &'static str {
        match self {
            Direction8::Right => "right",
            Direction8::UpRight => "up-right",
            Direction8::Up => "up",
            Direction8::UpLeft => "up-left",
            Direction8::Left => "left",
            Direction8::DownLeft => "down-left",
            Direction8::Down => "down",
            Direction8::DownRight => "down-right",
        }
    }
}

/// Normalize a displacement magnitude over `elapsed_ms` into world units per
/// 60 Hz reference frame. Returns None when the elapsed time is non-positive
/// (clock glitch or duplicated frame); such samples carry no usable velocity.
#[inline]
pub fn velocity_per_frame(displacement: f32, elapsed_ms: f64) -> Option<f32> {
    if elapsed_ms <= 0.0 {
        return None;
    }
    Some(displacement * (REFERENCE_FRAME_MS / elapsed_ms) as f32)
}
