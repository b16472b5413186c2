//! Target lifecycle: spawning on a cadence, linear depth approach,
//! idempotent hit claiming, and pruning of finished targets.

use crate::api::types::TargetId;
use crate::core::config::EngineConfig;
use crate::core::geom::{Direction8, ALL_DIRECTIONS};
use crate::core::rng::Rng;
use crate::pose::frame::{Limb, BOTH_LIMBS};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    /// In flight toward its hit moment.
    Approaching,
    /// Claimed by a swipe; removed on the next prune pass.
    Hit,
    /// Fell past the miss bound unhit; reported and removed by pruning.
    Missed,
}

impl TargetState {
    pub fn code(self) -> u8 {
        match self {
            TargetState::Approaching => 0,
            TargetState::Hit => 1,
            TargetState::Missed => 2,
        }
    }
}

/// A spawned, time-bound objective the player must swipe through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Screen position in world pixels. Fixed for the target's lifetime.
    pub pos: Vec2,
    /// Distance cue: `depth_max` at spawn (far), 0 exactly at `hit_time_ms`,
    /// negative once the hit moment has passed. Frozen when hit.
    pub depth: f32,
    pub direction: Direction8,
    pub limb: Limb,
    pub spawn_time_ms: f64,
    pub hit_time_ms: f64,
    pub state: TargetState,
}

impl Target {
    /// Approach progress: 0 at spawn, 1 at the hit moment, beyond 1 after.
    pub fn progress(&self, depth_max: f32) -> f32 {
        if depth_max > 0.0 {
            1.0 - self.depth / depth_max
        } else {
            0.0
        }
    }
}

/// Owner of every in-flight target.
///
/// All target mutation goes through this type: spawning, depth advancement,
/// pruning, and the single `claim_hit` entry the resolver uses. Nothing else
/// holds a mutable reference to a target.
#[derive(Debug, Clone)]
pub struct TargetField {
    targets: Vec<Target>,
    next_id: u32,
}

impl TargetField {
    pub fn new() -> Self {
        Self {
            targets: Vec::with_capacity(16),
            next_id: 1,
        }
    }

    /// Spawn a target with random position, direction, and limb.
    /// Returns None (and spawns nothing) while the field is at capacity.
    pub fn spawn(
        &mut self,
        now_ms: f64,
        config: &EngineConfig,
        rng: &mut Rng,
    ) -> Option<&Target> {
        if self.targets.len() >= config.max_targets {
            return None;
        }
        let margin = config.spawn_margin_px;
        let pos = Vec2::new(
            rng.range(margin, config.world_width - margin),
            rng.range(margin, config.world_height - margin),
        );
        let direction = ALL_DIRECTIONS[rng.next_int(8) as usize];
        let limb = BOTH_LIMBS[rng.next_int(2) as usize];

        let id = TargetId(self.next_id);
        self.next_id += 1;

        self.targets.push(Target {
            id,
            pos,
            depth: config.depth_max,
            direction,
            limb,
            spawn_time_ms: now_ms,
            hit_time_ms: now_ms + config.approach_duration_ms,
            state: TargetState::Approaching,
        });
        self.targets.last()
    }

    /// Recompute depth for every approaching target: a linear slide from
    /// `depth_max` at spawn to 0 at the hit moment. Each target runs on the
    /// approach duration frozen into it at spawn; a config swap reschedules
    /// only later spawns. Hit targets keep the depth they were claimed at.
    pub fn advance(&mut self, now_ms: f64, config: &EngineConfig) {
        for target in &mut self.targets {
            if target.state != TargetState::Approaching {
                continue;
            }
            let duration = target.hit_time_ms - target.spawn_time_ms;
            let elapsed = now_ms - target.spawn_time_ms;
            let factor = 1.0 - elapsed / duration;
            target.depth = (config.depth_max as f64 * factor) as f32;
        }
    }

    /// Remove finished targets. Hit targets leave silently (their event
    /// fired at claim time); targets that fell past the miss bound are
    /// marked `Missed` and pushed to `missed` for the score ledger.
    pub fn prune_into(&mut self, config: &EngineConfig, missed: &mut Vec<Target>) {
        let mut i = 0;
        while i < self.targets.len() {
            match self.targets[i].state {
                TargetState::Hit => {
                    self.targets.swap_remove(i);
                }
                _ if self.targets[i].depth < -config.depth_miss_slack => {
                    let mut target = self.targets.swap_remove(i);
                    target.state = TargetState::Missed;
                    missed.push(target);
                }
                _ => i += 1,
            }
        }
    }

    /// Transition a target to `Hit`. Returns true only for the first claim
    /// of an approaching target; repeats and unknown ids are silent no-ops.
    pub fn claim_hit(&mut self, id: TargetId) -> bool {
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(target) if target.state == TargetState::Approaching => {
                target.state = TargetState::Hit;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// The live target list as a slice, for the resolver and snapshots.
    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

impl Default for TargetField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn spawn_assigns_monotonic_ids_inside_bounds() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(42);
        let cfg = config();
        for expected_id in 1..=5u32 {
            let target = field.spawn(0.0, &cfg, &mut rng).expect("under capacity");
            assert_eq!(target.id, TargetId(expected_id));
            assert!(target.pos.x >= cfg.spawn_margin_px);
            assert!(target.pos.x <= cfg.world_width - cfg.spawn_margin_px);
            assert!(target.pos.y >= cfg.spawn_margin_px);
            assert!(target.pos.y <= cfg.world_height - cfg.spawn_margin_px);
            assert_eq!(target.depth, cfg.depth_max);
            assert_eq!(target.hit_time_ms, cfg.approach_duration_ms);
        }
    }

    #[test]
    fn spawn_saturates_at_capacity() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(1);
        let mut cfg = config();
        cfg.max_targets = 2;
        assert!(field.spawn(0.0, &cfg, &mut rng).is_some());
        assert!(field.spawn(0.0, &cfg, &mut rng).is_some());
        assert!(field.spawn(0.0, &cfg, &mut rng).is_none());
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn seeded_spawns_are_reproducible() {
        let cfg = config();
        let mut field_a = TargetField::new();
        let mut field_b = TargetField::new();
        let mut rng_a = Rng::new(777);
        let mut rng_b = Rng::new(777);
        for _ in 0..5 {
            let a = *field_a.spawn(0.0, &cfg, &mut rng_a).unwrap();
            let b = *field_b.spawn(0.0, &cfg, &mut rng_b).unwrap();
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.direction, b.direction);
            assert_eq!(a.limb, b.limb);
        }
    }

    #[test]
    fn depth_is_linear_with_exact_midpoint() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(3);
        let cfg = config(); // approach 3000 ms, depth_max 1000
        field.spawn(0.0, &cfg, &mut rng);

        field.advance(1500.0, &cfg);
        let target = field.iter().next().unwrap();
        assert!((target.depth - 500.0).abs() < 1e-3, "midpoint depth {}", target.depth);

        field.advance(3000.0, &cfg);
        let target = field.iter().next().unwrap();
        assert!(target.depth.abs() < 1e-3, "hit-time depth {}", target.depth);

        field.advance(3300.0, &cfg);
        let target = field.iter().next().unwrap();
        assert!(target.depth < 0.0, "past hit time depth {}", target.depth);
    }

    #[test]
    fn advance_keeps_the_spawn_schedule_after_a_config_swap() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(3);
        let cfg = config(); // approach 3000 ms
        field.spawn(0.0, &cfg, &mut rng);

        let mut swapped = config();
        swapped.approach_duration_ms = 1000.0;
        field.advance(1500.0, &swapped);
        let target = field.iter().next().unwrap();
        assert!(
            (target.depth - 500.0).abs() < 1e-3,
            "depth {} must follow the 3000 ms schedule frozen at spawn",
            target.depth
        );

        swapped.approach_duration_ms = 9000.0;
        field.advance(1500.0, &swapped);
        let target = field.iter().next().unwrap();
        assert!((target.depth - 500.0).abs() < 1e-3, "depth {}", target.depth);

        let mut missed = Vec::new();
        field.prune_into(&swapped, &mut missed);
        assert!(missed.is_empty(), "swap must not push a mid-flight target past the miss bound");
    }

    #[test]
    fn claim_hit_is_idempotent() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(5);
        let cfg = config();
        let id = field.spawn(0.0, &cfg, &mut rng).unwrap().id;

        assert!(field.claim_hit(id));
        assert!(!field.claim_hit(id), "second claim must be a no-op");
        assert_eq!(field.get(id).unwrap().state, TargetState::Hit);
    }

    #[test]
    fn claim_hit_on_unknown_id_is_a_no_op() {
        let mut field = TargetField::new();
        assert!(!field.claim_hit(TargetId(99)));
    }

    #[test]
    fn hit_targets_keep_their_claimed_depth() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(5);
        let cfg = config();
        let id = field.spawn(0.0, &cfg, &mut rng).unwrap().id;

        field.advance(1500.0, &cfg);
        field.claim_hit(id);
        field.advance(2900.0, &cfg);
        assert!((field.get(id).unwrap().depth - 500.0).abs() < 1e-3);
    }

    #[test]
    fn prune_drops_hit_silently_and_reports_misses() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(8);
        let cfg = config();
        let hit_id = field.spawn(0.0, &cfg, &mut rng).unwrap().id;
        let miss_id = field.spawn(0.0, &cfg, &mut rng).unwrap().id;
        let live_id = field.spawn(2000.0, &cfg, &mut rng).unwrap().id;

        field.claim_hit(hit_id);
        // 3400 ms in: the unhit 0 ms spawns are ~133 units past zero depth,
        // beyond the 100 unit slack; the 2000 ms spawn is still mid-flight.
        field.advance(3400.0, &cfg);

        let mut missed = Vec::new();
        field.prune_into(&cfg, &mut missed);

        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].id, miss_id);
        assert_eq!(missed[0].state, TargetState::Missed);
        assert_eq!(field.len(), 1);
        assert!(field.get(live_id).is_some());
        assert!(field.get(hit_id).is_none());
    }

    #[test]
    fn prune_keeps_targets_inside_the_slack() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(8);
        let cfg = config();
        field.spawn(0.0, &cfg, &mut rng);

        // 3200 ms in: depth ≈ -66, within the 100 unit slack.
        field.advance(3200.0, &cfg);
        let mut missed = Vec::new();
        field.prune_into(&cfg, &mut missed);

        assert!(missed.is_empty());
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn progress_tracks_depth() {
        let mut field = TargetField::new();
        let mut rng = Rng::new(2);
        let cfg = config();
        field.spawn(0.0, &cfg, &mut rng);
        field.advance(750.0, &cfg);
        let target = field.iter().next().unwrap();
        assert!((target.progress(cfg.depth_max) - 0.25).abs() < 1e-3);
    }
}
