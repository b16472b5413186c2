/// Pausable game clock driven by host timestamps.
///
/// The host hands us `performance.now()`-style wall times; the clock converts
/// them into a monotonic game-time axis (milliseconds since session start)
/// that stops advancing while paused. Everything downstream (target hit
/// times, swipe recency, spawn scheduling) reads this axis and never the
/// wall clock, so a paused session resumes exactly where it left off.
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Accumulated game time in ms. Frozen while paused.
    game_time_ms: f64,
    /// Host timestamp of the previous advance, if running.
    last_host_ms: Option<f64>,
    /// Largest dt accepted per advance; longer gaps (tab hidden, debugger)
    /// are clamped so the field does not teleport forward.
    max_step_ms: f64,
    paused: bool,
}

/// Default clamp on a single clock step, in ms.
pub const DEFAULT_MAX_STEP_MS: f64 = 250.0;

impl GameClock {
    pub fn new() -> Self {
        Self {
            game_time_ms: 0.0,
            last_host_ms: None,
            max_step_ms: DEFAULT_MAX_STEP_MS,
            paused: false,
        }
    }

    /// Advance to the given host timestamp. Returns the clamped delta in ms
    /// (0 while paused, on the first call, or if the host clock ran backward).
    pub fn advance(&mut self, host_now_ms: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        let dt = match self.last_host_ms {
            Some(prev) => (host_now_ms - prev).clamp(0.0, self.max_step_ms),
            None => 0.0,
        };
        self.last_host_ms = Some(host_now_ms);
        self.game_time_ms += dt;
        dt
    }

    /// Current game time in ms since the session started, pauses excluded.
    pub fn now_ms(&self) -> f64 {
        self.game_time_ms
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause. The host anchor is dropped so the wall time that
    /// passed while paused never reaches the game axis.
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_host_ms = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reset to time zero, running.
    pub fn reset(&mut self) {
        self.game_time_ms = 0.0;
        self.last_host_ms = None;
        self.paused = false;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Interval timer for target spawning, fed by clock deltas.
///
/// Unlike a fixed-timestep accumulator this never runs a catch-up burst:
/// after a long stall the backlog is capped at a single interval, so the
/// player returns to one fresh target instead of a wall of overdue ones.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval_ms: f64,
    accumulator_ms: f64,
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            accumulator_ms: 0.0,
        }
    }

    /// Add elapsed game time. Returns true when a spawn is due.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.accumulator_ms = (self.accumulator_ms + dt_ms).min(self.interval_ms * 2.0);
        if self.accumulator_ms >= self.interval_ms {
            self.accumulator_ms -= self.interval_ms;
            // Drop any remaining backlog beyond one interval.
            self.accumulator_ms = self.accumulator_ms.min(self.interval_ms);
            true
        } else {
            false
        }
    }

    /// Change the interval, keeping accumulated progress.
    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(1.0);
        self.accumulator_ms = self.accumulator_ms.min(self.interval_ms);
    }

    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}
