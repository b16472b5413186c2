//! Frozen view of engine state for rendering and diagnostics.
//!
//! External readers get copies, never live references into the engine;
//! a snapshot stays valid however the engine moves on.

use crate::api::engine::EngineStats;
use crate::api::types::GamePhase;
use crate::pose::swipe::SwipeEvent;
use crate::systems::targets::Target;
use serde::Serialize;

/// Everything a renderer or debug overlay needs for one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub game_time_ms: f64,
    pub total_score: u64,
    pub combo: u32,
    /// Multiplier the next hit would receive.
    pub multiplier: f32,
    pub targets: Vec<Target>,
    pub recent_swipes: Vec<SwipeEvent>,
    pub stats: EngineStats,
}

impl Snapshot {
    /// Serialize for diagnostics dumps and the debug overlay.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
