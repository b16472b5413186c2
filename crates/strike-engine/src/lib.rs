pub mod api;
pub mod bridge;
pub mod core;
pub mod pose;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::engine::{Engine, EngineStats};
pub use api::types::{EngineEvent, EventRecord, GamePhase, TargetId};
pub use bridge::protocol::{ProtocolLayout, SwipeRecord, TargetRecord, PROTOCOL_VERSION};
pub use bridge::snapshot::Snapshot;
pub use core::clock::{GameClock, SpawnTimer};
pub use core::config::{ConfigError, EngineConfig};
pub use core::geom::{Direction8, REFERENCE_FRAME_MS};
pub use core::rng::Rng;
pub use pose::frame::{Keypoint, Limb, LimbTracker, PoseFrame, WristSample};
pub use pose::swipe::{SwipeBuffer, SwipeEvent};
pub use systems::resolver::{resolve_hits, HitClaim};
pub use systems::scoring::{HitScore, ScoreLedger};
pub use systems::targets::{Target, TargetField, TargetState};
