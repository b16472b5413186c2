//! Hit resolution: matches the current pose frame and recent swipes
//! against the in-flight targets and decides which targets are claimed.
//!
//! The resolver is read-only. It returns claims in application order;
//! the engine applies them through `TargetField::claim_hit`, which
//! refuses targets that are no longer approaching.

use crate::api::types::TargetId;
use crate::core::config::EngineConfig;
use crate::core::geom::Direction8;
use crate::pose::frame::{Limb, PoseFrame};
use crate::pose::swipe::SwipeBuffer;
use crate::systems::targets::{Target, TargetState};

/// A target the resolver decided to claim, with the numbers scoring needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitClaim {
    pub target: TargetId,
    /// |now - hit_time| at resolution, in ms.
    pub timing_diff_ms: f64,
    /// Wrist-to-target distance at resolution, in world pixels.
    pub distance: f32,
}

/// Resolve one pose frame against the target list.
///
/// A target is claimable when, simultaneously: its limb's wrist is observed
/// above the confidence floor, the wrist is inside the hit radius, now is
/// inside the timing window, and a matching-direction swipe on that limb
/// exists within the recency window. When several targets compete, the
/// smallest timing diff wins; one swipe claims at most one target per pass,
/// so the runner-up stays pending for a later frame.
pub fn resolve_hits(
    targets: &[Target],
    swipes: &SwipeBuffer,
    frame: &PoseFrame,
    now_ms: f64,
    config: &EngineConfig,
) -> Vec<HitClaim> {
    let mut candidates: Vec<(HitClaim, (Limb, Direction8))> = Vec::new();

    for target in targets {
        if target.state != TargetState::Approaching {
            continue;
        }
        let wrist = match frame.observed_wrist(target.limb, config.min_limb_confidence) {
            Some(kp) => kp,
            None => continue,
        };
        let distance = wrist.pos.distance(target.pos);
        if distance >= config.hit_radius_px {
            continue;
        }
        let timing_diff_ms = (now_ms - target.hit_time_ms).abs();
        if timing_diff_ms >= config.timing_window_ms {
            continue;
        }
        if swipes
            .latest_match(target.limb, target.direction, now_ms, config.swipe_recency_ms)
            .is_none()
        {
            continue;
        }
        candidates.push((
            HitClaim {
                target: target.id,
                timing_diff_ms,
                distance,
            },
            (target.limb, target.direction),
        ));
    }

    // Closest to its ideal hit instant goes first.
    candidates.sort_by(|a, b| a.0.timing_diff_ms.total_cmp(&b.0.timing_diff_ms));

    // latest_match is deterministic per (limb, direction), so that pair
    // identifies the swipe a candidate matched.
    let mut used: Vec<(Limb, Direction8)> = Vec::new();
    let mut claims = Vec::with_capacity(candidates.len());
    for (claim, swipe_key) in candidates {
        if used.contains(&swipe_key) {
            continue;
        }
        used.push(swipe_key);
        claims.push(claim);
    }
    claims
}
