//! Score and combo accounting.
//!
//! A hit is worth a timing component plus an accuracy component, both linear
//! decays from their caps, scaled by the combo multiplier in force *before*
//! the hit. Totals are exposed read-only; only the engine records outcomes.

use crate::core::config::EngineConfig;
use serde::{Deserialize, Serialize};

/// The ledger's verdict for one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitScore {
    /// Rounded points added to the total.
    pub points: u32,
    /// Combo after this hit.
    pub combo: u32,
    /// Multiplier that was applied (from the combo before this hit).
    pub multiplier: f32,
    /// Unscaled timing + accuracy sum.
    pub raw: f32,
}

/// Running totals for one session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreLedger {
    total_score: u64,
    combo: u32,
    best_combo: u32,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiplier the next hit would receive.
    pub fn multiplier(&self, config: &EngineConfig) -> f32 {
        (1.0 + self.combo as f32 * config.combo_step).min(config.max_combo_multiplier)
    }

    /// Record a successful hit and return its score breakdown.
    ///
    /// `timing_diff_ms` is the absolute distance from the target's hit
    /// moment, `distance` the wrist-to-target distance at resolution time.
    /// Both components decay linearly to zero at their window edge and
    /// never go negative.
    pub fn record_hit(
        &mut self,
        timing_diff_ms: f64,
        distance: f32,
        config: &EngineConfig,
    ) -> HitScore {
        let timing = (config.timing_score_cap
            * (1.0 - (timing_diff_ms / config.timing_window_ms) as f32))
            .max(0.0);
        let accuracy = (config.accuracy_score_cap * (1.0 - distance / config.hit_radius_px)).max(0.0);
        let raw = timing + accuracy;
        let multiplier = self.multiplier(config);
        let points = (raw * multiplier).round() as u32;

        self.total_score += points as u64;
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);

        HitScore {
            points,
            combo: self.combo,
            multiplier,
            raw,
        }
    }

    /// Record a missed target. Returns true when this broke a running combo.
    pub fn record_miss(&mut self, config: &EngineConfig) -> bool {
        if config.break_combo_on_miss && self.combo > 0 {
            self.combo = 0;
            true
        } else {
            false
        }
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
