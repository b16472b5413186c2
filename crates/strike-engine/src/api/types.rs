use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a spawned target. Monotonic per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Session phase. Targets spawn, advance, and score only while `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed or reset; waiting for `start()`.
    Idle,
    Playing,
    Paused,
}

impl GamePhase {
    pub fn code(self) -> u8 {
        match self {
            GamePhase::Idle => 0,
            GamePhase::Playing => 1,
            GamePhase::Paused => 2,
        }
    }
}

/// A discrete notification for renderer/audio/haptic hookups, drained by
/// the host after each engine call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    Started,
    Paused,
    Resumed,
    Hit {
        target: TargetId,
        points: u32,
        combo: u32,
    },
    Miss {
        target: TargetId,
        combo_broken: bool,
    },
    ComboChanged {
        combo: u32,
        multiplier: f32,
    },
}

impl EngineEvent {
    /// Encode into the flat wire form. `kind` identifies the event,
    /// `a/b/c` carry the payload.
    pub fn to_record(self) -> EventRecord {
        match self {
            EngineEvent::Started => EventRecord::new(1.0, 0.0, 0.0, 0.0),
            EngineEvent::Paused => EventRecord::new(2.0, 0.0, 0.0, 0.0),
            EngineEvent::Resumed => EventRecord::new(3.0, 0.0, 0.0, 0.0),
            EngineEvent::Hit {
                target,
                points,
                combo,
            } => EventRecord::new(4.0, target.0 as f32, points as f32, combo as f32),
            EngineEvent::Miss {
                target,
                combo_broken,
            } => EventRecord::new(
                5.0,
                target.0 as f32,
                if combo_broken { 1.0 } else { 0.0 },
                0.0,
            ),
            EngineEvent::ComboChanged { combo, multiplier } => {
                EventRecord::new(6.0, combo as f32, multiplier, 0.0)
            }
        }
    }
}

/// An engine event in wire form, communicated to TypeScript through the
/// flat snapshot buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }

    pub fn to_floats(self) -> [f32; Self::FLOATS] {
        bytemuck::cast(self)
    }
}
