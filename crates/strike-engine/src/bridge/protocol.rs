/// Shared output buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Targets: max_targets × 8 floats]
/// [Swipes: max_swipes × 4 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::types::EventRecord;
use crate::core::config::EngineConfig;
use crate::pose::swipe::SwipeEvent;
use crate::systems::targets::Target;
use bytemuck::{Pod, Zeroable};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_TARGETS: usize = 2;
pub const HEADER_TARGET_COUNT: usize = 3;
pub const HEADER_MAX_SWIPES: usize = 4;
pub const HEADER_SWIPE_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_TOTAL_SCORE: usize = 8;
pub const HEADER_COMBO: usize = 9;
pub const HEADER_MULTIPLIER: usize = 10;
pub const HEADER_PHASE: usize = 11;
pub const HEADER_GAME_TIME_MS: usize = 12;
pub const HEADER_WORLD_WIDTH: usize = 13;
pub const HEADER_WORLD_HEIGHT: usize = 14;
pub const HEADER_PROTOCOL_VERSION: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per target record (wire format, never changes).
pub const TARGET_FLOATS: usize = 8;

/// Floats per swipe record (wire format, never changes).
pub const SWIPE_FLOATS: usize = 4;

/// Floats per engine event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = EventRecord::FLOATS;

/// One target on the wire: id, x, y, depth, direction, limb, state, progress.
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
#[repr(C)]
pub struct TargetRecord {
    pub id: f32,
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub direction: f32,
    pub limb: f32,
    pub state: f32,
    pub progress: f32,
}

impl TargetRecord {
    pub fn from_target(target: &Target, depth_max: f32) -> Self {
        Self {
            id: target.id.0 as f32,
            x: target.pos.x,
            y: target.pos.y,
            depth: target.depth,
            direction: target.direction.index() as f32,
            limb: target.limb.index() as f32,
            state: target.state.code() as f32,
            progress: target.progress(depth_max),
        }
    }

    pub fn to_floats(self) -> [f32; TARGET_FLOATS] {
        bytemuck::cast(self)
    }
}

/// One recognized swipe on the wire: limb, direction, velocity, age in ms.
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
#[repr(C)]
pub struct SwipeRecord {
    pub limb: f32,
    pub direction: f32,
    pub velocity: f32,
    pub age_ms: f32,
}

impl SwipeRecord {
    pub fn from_event(swipe: &SwipeEvent, now_ms: f64) -> Self {
        Self {
            limb: swipe.limb.index() as f32,
            direction: swipe.direction.index() as f32,
            velocity: swipe.velocity,
            age_ms: (now_ms - swipe.at_ms) as f32,
        }
    }

    pub fn to_floats(self) -> [f32; SWIPE_FLOATS] {
        bytemuck::cast(self)
    }
}

/// Runtime-computed buffer layout, derived from the config capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum targets in flight.
    pub max_targets: usize,
    /// Maximum buffered swipes.
    pub max_swipes: usize,
    /// Maximum queued events per publish.
    pub max_events: usize,

    /// Size of target data section in floats.
    pub target_data_floats: usize,
    /// Size of swipe data section in floats.
    pub swipe_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where target data begins.
    pub target_data_offset: usize,
    /// Offset (in floats) where swipe data begins.
    pub swipe_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_targets: usize, max_swipes: usize, max_events: usize) -> Self {
        let target_data_floats = max_targets * TARGET_FLOATS;
        let swipe_data_floats = max_swipes * SWIPE_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let target_data_offset = HEADER_FLOATS;
        let swipe_data_offset = target_data_offset + target_data_floats;
        let event_data_offset = swipe_data_offset + swipe_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_targets,
            max_swipes,
            max_events,
            target_data_floats,
            swipe_data_floats,
            event_data_floats,
            target_data_offset,
            swipe_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from an EngineConfig.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_targets, config.max_swipes, config.max_events)
    }
}
