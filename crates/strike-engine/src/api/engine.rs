//! Engine façade: single owner of all game state.
//!
//! Exactly two data entry points feed it: `on_tick` from the host's
//! animation loop and `on_pose_frame` from the pose source. Session
//! controls (start/pause/resume/reset) and config hot-swap sit alongside.
//! Both entry points run on the caller's thread; serializing them is the
//! host's contract, and in a browser event loop it is automatic.

use crate::api::types::{EngineEvent, GamePhase};
use crate::bridge::snapshot::Snapshot;
use crate::core::clock::{GameClock, SpawnTimer};
use crate::core::config::{ConfigError, EngineConfig};
use crate::core::rng::Rng;
use crate::pose::frame::{LimbTracker, PoseFrame, WristSample, BOTH_LIMBS};
use crate::pose::swipe::{detect_swipe, SwipeBuffer, SwipeEvent};
use crate::systems::resolver::resolve_hits;
use crate::systems::scoring::ScoreLedger;
use crate::systems::targets::{Target, TargetField};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Session counters for the diagnostics overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub ticks: u64,
    pub pose_frames: u64,
    pub swipes: u64,
    pub targets_spawned: u64,
    pub hits: u64,
    pub misses: u64,
    pub best_combo: u32,
}

const DEFAULT_SEED: u64 = 42;

pub struct Engine {
    config: EngineConfig,
    phase: GamePhase,
    clock: GameClock,
    spawn_timer: SpawnTimer,
    seed: u64,
    rng: Rng,
    targets: TargetField,
    swipes: SwipeBuffer,
    tracker: LimbTracker,
    ledger: ScoreLedger,
    stats: EngineStats,
    events: Vec<EngineEvent>,
    missed_scratch: Vec<Target>,
}

impl Engine {
    /// Build an engine with the default spawn seed.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, DEFAULT_SEED)
    }

    /// Build an engine with an explicit seed so spawn sequences replay
    /// exactly. Rejects invalid configs before any state exists.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        // The clock stays frozen until start(); idle host ticks only count.
        let mut clock = GameClock::new();
        clock.pause();
        let spawn_timer = SpawnTimer::new(config.spawn_interval_ms);
        let swipes = SwipeBuffer::new(config.max_swipes);
        info!(
            "engine ready: {:.0}x{:.0} world, spawn every {:.0} ms, seed {}",
            config.world_width, config.world_height, config.spawn_interval_ms, seed
        );
        Ok(Self {
            config,
            phase: GamePhase::Idle,
            clock,
            spawn_timer,
            seed,
            rng: Rng::new(seed),
            targets: TargetField::new(),
            swipes,
            tracker: LimbTracker::new(),
            ledger: ScoreLedger::new(),
            stats: EngineStats::default(),
            events: Vec::new(),
            missed_scratch: Vec::new(),
        })
    }

    // ---- session controls ----

    /// Begin playing. Only meaningful from `Idle`; otherwise a no-op.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            debug!("start ignored in phase {:?}", self.phase);
            return;
        }
        self.phase = GamePhase::Playing;
        self.clock.resume();
        self.push_event(EngineEvent::Started);
        info!("session started");
    }

    /// Freeze the game clock. Targets stop aging; resume picks up exactly
    /// where play left off, so pausing never produces a burst of misses.
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Paused;
        self.clock.pause();
        self.push_event(EngineEvent::Paused);
        info!("session paused at {:.0} ms", self.clock.now_ms());
    }

    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Playing;
        self.clock.resume();
        self.push_event(EngineEvent::Resumed);
        info!("session resumed at {:.0} ms", self.clock.now_ms());
    }

    /// Drop all session state and return to `Idle`. The RNG is re-seeded,
    /// so the next session replays the same spawn sequence.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.clock.reset();
        self.clock.pause();
        self.spawn_timer.reset();
        self.spawn_timer.set_interval(self.config.spawn_interval_ms);
        self.rng = Rng::new(self.seed);
        self.targets.clear();
        self.swipes.clear();
        self.tracker.reset();
        self.ledger.reset();
        self.stats = EngineStats::default();
        self.events.clear();
        info!("engine reset");
    }

    /// Swap the running configuration. All-or-nothing: an invalid config
    /// is rejected and the prior one stays in force.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.spawn_timer.set_interval(config.spawn_interval_ms);
        self.swipes.set_capacity(config.max_swipes);
        self.config = config;
        info!("config updated");
        Ok(())
    }

    // ---- data entry points ----

    /// Advance the session to the host's animation timestamp: age targets,
    /// report misses, and spawn on cadence. Does nothing but count while
    /// not playing.
    pub fn on_tick(&mut self, host_now_ms: f64) {
        self.stats.ticks += 1;
        let dt_ms = self.clock.advance(host_now_ms);
        if self.phase != GamePhase::Playing {
            return;
        }
        let now_ms = self.clock.now_ms();

        self.targets.advance(now_ms, &self.config);

        self.missed_scratch.clear();
        self.targets.prune_into(&self.config, &mut self.missed_scratch);
        for i in 0..self.missed_scratch.len() {
            let target = self.missed_scratch[i];
            self.report_miss(&target);
        }

        if self.spawn_timer.tick(dt_ms) {
            match self.targets.spawn(now_ms, &self.config, &mut self.rng) {
                Some(target) => {
                    self.stats.targets_spawned += 1;
                    debug!(
                        "spawned target {} ({} {}) at ({:.0}, {:.0})",
                        target.id.0,
                        target.limb.label(),
                        target.direction.label(),
                        target.pos.x,
                        target.pos.y
                    );
                }
                None => debug!("target capacity reached, spawn skipped"),
            }
        }

        self.swipes
            .prune_older_than(now_ms, self.config.swipe_recency_ms);
    }

    /// Feed one pose frame: update wrist tracking, recognize swipes, and
    /// resolve hits. Wrist tracking runs in every phase so play resumes
    /// seamlessly; swipes are recorded and resolved only while playing.
    pub fn on_pose_frame(&mut self, frame: &PoseFrame) {
        self.stats.pose_frames += 1;
        let now_ms = self.clock.now_ms();

        for limb in BOTH_LIMBS {
            let sample = frame
                .observed_wrist(limb, self.config.min_limb_confidence)
                .map(|kp| WristSample {
                    pos: kp.pos,
                    captured_at_ms: frame.captured_at_ms,
                });
            let pair = self.tracker.observe(limb, sample);
            if self.phase != GamePhase::Playing {
                continue;
            }
            if let Some((prev, curr)) = pair {
                if let Some(motion) = detect_swipe(
                    prev,
                    curr,
                    self.config.min_swipe_displacement,
                    self.config.min_swipe_velocity,
                ) {
                    self.swipes.push(SwipeEvent {
                        limb,
                        direction: motion.direction,
                        velocity: motion.velocity,
                        displacement: motion.displacement,
                        at_ms: now_ms,
                    });
                    self.stats.swipes += 1;
                    debug!(
                        "swipe {} {} v={:.1}",
                        limb.label(),
                        motion.direction.label(),
                        motion.velocity
                    );
                }
            }
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        self.swipes
            .prune_older_than(now_ms, self.config.swipe_recency_ms);

        let claims = resolve_hits(
            self.targets.as_slice(),
            &self.swipes,
            frame,
            now_ms,
            &self.config,
        );
        for claim in claims {
            // claim_hit is idempotent; a repeat resolution of the same
            // frame falls through here without scoring twice.
            if !self.targets.claim_hit(claim.target) {
                continue;
            }
            let score = self
                .ledger
                .record_hit(claim.timing_diff_ms, claim.distance, &self.config);
            self.stats.hits += 1;
            self.stats.best_combo = self.ledger.best_combo();
            debug!(
                "hit target {}: {} points (raw {:.1} x{:.2}), combo {}",
                claim.target.0, score.points, score.raw, score.multiplier, score.combo
            );
            self.push_event(EngineEvent::Hit {
                target: claim.target,
                points: score.points,
                combo: score.combo,
            });
            self.push_event(EngineEvent::ComboChanged {
                combo: score.combo,
                multiplier: self.ledger.multiplier(&self.config),
            });
        }
    }

    // ---- read side ----

    /// Frozen copy of everything a renderer needs.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            game_time_ms: self.clock.now_ms(),
            total_score: self.ledger.total_score(),
            combo: self.ledger.combo(),
            multiplier: self.ledger.multiplier(&self.config),
            targets: self.targets.as_slice().to_vec(),
            recent_swipes: self.swipes.iter().copied().collect(),
            stats: self.stats,
        }
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Game time in ms: monotonic, frozen while paused or idle.
    pub fn game_time_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn targets(&self) -> &[Target] {
        self.targets.as_slice()
    }

    pub fn recent_swipes(&self) -> impl Iterator<Item = &SwipeEvent> {
        self.swipes.iter()
    }

    pub fn total_score(&self) -> u64 {
        self.ledger.total_score()
    }

    pub fn combo(&self) -> u32 {
        self.ledger.combo()
    }

    pub fn multiplier(&self) -> f32 {
        self.ledger.multiplier(&self.config)
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    // ---- internals ----

    fn report_miss(&mut self, target: &Target) {
        let combo_broken = self.ledger.record_miss(&self.config);
        self.stats.misses += 1;
        debug!("missed target {}", target.id.0);
        self.push_event(EngineEvent::Miss {
            target: target.id,
            combo_broken,
        });
        if combo_broken {
            self.push_event(EngineEvent::ComboChanged {
                combo: 0,
                multiplier: self.ledger.multiplier(&self.config),
            });
        }
    }

    fn push_event(&mut self, event: EngineEvent) {
        if self.events.len() >= self.config.max_events {
            debug!("event queue full, dropping {:?}", event);
            return;
        }
        self.events.push(event);
    }
}
