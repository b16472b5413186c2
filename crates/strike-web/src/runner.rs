use strike_engine::bridge::protocol::{
    HEADER_COMBO, HEADER_EVENT_COUNT, HEADER_FRAME_COUNTER, HEADER_GAME_TIME_MS, HEADER_LOCK,
    HEADER_MAX_EVENTS, HEADER_MAX_SWIPES, HEADER_MAX_TARGETS, HEADER_MULTIPLIER, HEADER_PHASE,
    HEADER_PROTOCOL_VERSION, HEADER_SWIPE_COUNT, HEADER_TARGET_COUNT, HEADER_TOTAL_SCORE,
    HEADER_WORLD_HEIGHT, HEADER_WORLD_WIDTH, EVENT_FLOATS, PROTOCOL_VERSION, SWIPE_FLOATS,
    TARGET_FLOATS,
};
use strike_engine::{
    ConfigError, Engine, EngineConfig, PoseFrame, ProtocolLayout, SwipeRecord, TargetRecord,
};

/// Owns the engine and a flat f32 publish buffer that TypeScript reads
/// directly out of wasm memory. `lib.rs` holds the one live instance in a
/// `thread_local!` behind the `#[wasm_bindgen]` exports.
///
/// Every mutating call republishes: the buffer always reflects the state
/// after the most recent engine call. The lock slot is nonzero while a
/// publish is in flight so a worker reading concurrently can retry.
pub struct EngineRunner {
    engine: Engine,
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    frame_counter: u32,
}

impl EngineRunner {
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        let layout = ProtocolLayout::from_config(&config);
        let engine = Engine::with_seed(config, seed)?;
        let buffer = vec![0.0; layout.buffer_total_floats];
        let mut runner = Self {
            engine,
            layout,
            buffer,
            frame_counter: 0,
        };
        runner.write_static_header();
        runner.publish();
        Ok(runner)
    }

    // ---- session controls ----

    pub fn start(&mut self) {
        self.engine.start();
        self.publish();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
        self.publish();
    }

    pub fn resume(&mut self) {
        self.engine.resume();
        self.publish();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.publish();
    }

    /// Advance the engine to the host's animation timestamp.
    pub fn tick(&mut self, host_now_ms: f64) {
        self.engine.on_tick(host_now_ms);
        self.publish();
    }

    /// Feed one flat pose frame (17 keypoints × x, y, score). A frame of
    /// the wrong length is dropped and the buffer keeps its last publish.
    pub fn pose_frame(&mut self, data: &[f32], captured_at_ms: f64) {
        match PoseFrame::from_flat(data, captured_at_ms) {
            Some(frame) => {
                self.engine.on_pose_frame(&frame);
                self.publish();
            }
            None => {
                log::debug!("pose frame dropped: got {} floats", data.len());
            }
        }
    }

    /// Parse and apply a JSON config. On rejection the engine keeps its
    /// prior config and the buffer is untouched.
    pub fn apply_config_json(&mut self, json: &str) -> bool {
        let config = match EngineConfig::from_json(json) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("config rejected: {err}");
                return false;
            }
        };
        let layout = ProtocolLayout::from_config(&config);
        match self.engine.set_config(config) {
            Ok(()) => {
                if layout != self.layout {
                    self.buffer = vec![0.0; layout.buffer_total_floats];
                    self.layout = layout;
                }
                self.write_static_header();
                self.publish();
                true
            }
            Err(err) => {
                log::warn!("config rejected: {err}");
                false
            }
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        self.engine.snapshot().to_json()
    }

    // ---- publish ----

    /// Capacities and world bounds change only at init and config apply.
    fn write_static_header(&mut self) {
        self.buffer[HEADER_MAX_TARGETS] = self.layout.max_targets as f32;
        self.buffer[HEADER_MAX_SWIPES] = self.layout.max_swipes as f32;
        self.buffer[HEADER_MAX_EVENTS] = self.layout.max_events as f32;
        self.buffer[HEADER_WORLD_WIDTH] = self.engine.config().world_width;
        self.buffer[HEADER_WORLD_HEIGHT] = self.engine.config().world_height;
        self.buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    }

    /// Rewrite the dynamic sections and header fields from engine state.
    fn publish(&mut self) {
        self.buffer[HEADER_LOCK] = 1.0;

        let now_ms = self.engine.game_time_ms();
        let depth_max = self.engine.config().depth_max;

        let targets = self.engine.targets();
        let target_count = targets.len().min(self.layout.max_targets);
        let mut offset = self.layout.target_data_offset;
        for target in &targets[..target_count] {
            let floats = TargetRecord::from_target(target, depth_max).to_floats();
            self.buffer[offset..offset + TARGET_FLOATS].copy_from_slice(&floats);
            offset += TARGET_FLOATS;
        }

        let mut swipe_count = 0;
        let mut offset = self.layout.swipe_data_offset;
        for swipe in self.engine.recent_swipes().take(self.layout.max_swipes) {
            let floats = SwipeRecord::from_event(swipe, now_ms).to_floats();
            self.buffer[offset..offset + SWIPE_FLOATS].copy_from_slice(&floats);
            offset += SWIPE_FLOATS;
            swipe_count += 1;
        }

        let events = self.engine.drain_events();
        let event_count = events.len().min(self.layout.max_events);
        let mut offset = self.layout.event_data_offset;
        for event in &events[..event_count] {
            let floats = event.to_record().to_floats();
            self.buffer[offset..offset + EVENT_FLOATS].copy_from_slice(&floats);
            offset += EVENT_FLOATS;
        }

        self.buffer[HEADER_TARGET_COUNT] = target_count as f32;
        self.buffer[HEADER_SWIPE_COUNT] = swipe_count as f32;
        self.buffer[HEADER_EVENT_COUNT] = event_count as f32;
        self.buffer[HEADER_TOTAL_SCORE] = self.engine.total_score() as f32;
        self.buffer[HEADER_COMBO] = self.engine.combo() as f32;
        self.buffer[HEADER_MULTIPLIER] = self.engine.multiplier();
        self.buffer[HEADER_PHASE] = self.engine.phase().code() as f32;
        self.buffer[HEADER_GAME_TIME_MS] = now_ms as f32;

        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.buffer[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        self.buffer[HEADER_LOCK] = 0.0;
    }

    // ---- accessors for wasm exports ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn max_targets(&self) -> u32 {
        self.layout.max_targets as u32
    }

    pub fn max_swipes(&self) -> u32 {
        self.layout.max_swipes as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn world_width(&self) -> f32 {
        self.engine.config().world_width
    }

    pub fn world_height(&self) -> f32 {
        self.engine.config().world_height
    }
}
