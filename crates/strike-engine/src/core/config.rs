use serde::{Deserialize, Serialize};
use std::fmt;

/// Tunable engine parameters, provided by the host as JSON.
///
/// Field names are camelCase on the wire to match the JS host. Every field has
/// a default, so a partial document is valid: absent fields take their default
/// value. A document is accepted or rejected as a whole; validation failures
/// leave the running config untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Time between target spawns while playing, in ms.
    pub spawn_interval_ms: f64,
    /// Time a target takes from spawn to its hit moment, in ms.
    pub approach_duration_ms: f64,
    /// Maximum wrist-to-target distance for a hit, in world pixels.
    pub hit_radius_px: f32,
    /// Half-width of the timing window around `hit_time`, in ms.
    pub timing_window_ms: f64,
    /// Minimum swipe speed, in world units per 60 Hz reference frame.
    pub min_swipe_velocity: f32,
    /// Minimum displacement between pose frames to count as movement, in world pixels.
    pub min_swipe_displacement: f32,
    /// How far back the resolver looks for a matching swipe, in ms.
    pub swipe_recency_ms: f64,
    /// Keypoint confidence floor; wrists below it are treated as unobserved.
    pub min_limb_confidence: f32,
    /// Multiplier growth per combo step.
    pub combo_step: f32,
    /// Ceiling on the combo multiplier.
    pub max_combo_multiplier: f32,
    /// Points awarded for a perfectly timed hit.
    pub timing_score_cap: f32,
    /// Points awarded for a dead-center hit.
    pub accuracy_score_cap: f32,
    /// World width in pixels (camera frame size).
    pub world_width: f32,
    /// World height in pixels.
    pub world_height: f32,
    /// Spawn positions stay this far inside the world edges, in pixels.
    pub spawn_margin_px: f32,
    /// Depth value at spawn ("far").
    pub depth_max: f32,
    /// How far past depth zero an unhit target may fall before it counts as missed.
    pub depth_miss_slack: f32,
    /// Whether a miss resets the combo.
    pub break_combo_on_miss: bool,
    /// Maximum in-flight targets; spawns saturate at this count.
    pub max_targets: usize,
    /// Maximum buffered swipe events; oldest are evicted first.
    pub max_swipes: usize,
    /// Maximum engine events queued between drains.
    pub max_events: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1500.0,
            approach_duration_ms: 3000.0,
            hit_radius_px: 50.0,
            timing_window_ms: 200.0,
            min_swipe_velocity: 15.0,
            min_swipe_displacement: 20.0,
            swipe_recency_ms: 300.0,
            min_limb_confidence: 0.5,
            combo_step: 0.1,
            max_combo_multiplier: 4.0,
            timing_score_cap: 70.0,
            accuracy_score_cap: 30.0,
            world_width: 640.0,
            world_height: 480.0,
            spawn_margin_px: 60.0,
            depth_max: 1000.0,
            depth_miss_slack: 100.0,
            break_combo_on_miss: true,
            max_targets: 16,
            max_swipes: 32,
            max_events: 32,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every semantic bound. Called on construction and on hot-swap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.spawn_interval_ms.is_finite() && self.spawn_interval_ms > 0.0,
            "spawnIntervalMs",
            "must be a positive duration",
        )?;
        check(
            self.approach_duration_ms.is_finite() && self.approach_duration_ms > 0.0,
            "approachDurationMs",
            "must be a positive duration",
        )?;
        check(
            self.hit_radius_px.is_finite() && self.hit_radius_px > 0.0,
            "hitRadiusPx",
            "must be a positive distance",
        )?;
        check(
            self.timing_window_ms.is_finite() && self.timing_window_ms > 0.0,
            "timingWindowMs",
            "must be a positive duration",
        )?;
        check(
            self.min_swipe_velocity.is_finite() && self.min_swipe_velocity >= 0.0,
            "minSwipeVelocity",
            "must be non-negative",
        )?;
        check(
            self.min_swipe_displacement.is_finite() && self.min_swipe_displacement >= 0.0,
            "minSwipeDisplacement",
            "must be non-negative",
        )?;
        check(
            self.swipe_recency_ms.is_finite() && self.swipe_recency_ms > 0.0,
            "swipeRecencyMs",
            "must be a positive duration",
        )?;
        check(
            (0.0..=1.0).contains(&self.min_limb_confidence),
            "minLimbConfidence",
            "must be in [0, 1]",
        )?;
        check(
            self.combo_step.is_finite() && self.combo_step >= 0.0,
            "comboStep",
            "must be non-negative",
        )?;
        check(
            self.max_combo_multiplier.is_finite() && self.max_combo_multiplier >= 1.0,
            "maxComboMultiplier",
            "must be at least 1",
        )?;
        check(
            self.timing_score_cap.is_finite() && self.timing_score_cap >= 0.0,
            "timingScoreCap",
            "must be non-negative",
        )?;
        check(
            self.accuracy_score_cap.is_finite() && self.accuracy_score_cap >= 0.0,
            "accuracyScoreCap",
            "must be non-negative",
        )?;
        check(
            self.world_width.is_finite() && self.world_width > 0.0,
            "worldWidth",
            "must be a positive size",
        )?;
        check(
            self.world_height.is_finite() && self.world_height > 0.0,
            "worldHeight",
            "must be a positive size",
        )?;
        check(
            self.spawn_margin_px.is_finite() && self.spawn_margin_px >= 0.0,
            "spawnMarginPx",
            "must be non-negative",
        )?;
        check(
            self.spawn_margin_px * 2.0 < self.world_width
                && self.spawn_margin_px * 2.0 < self.world_height,
            "spawnMarginPx",
            "margins leave no spawn area",
        )?;
        check(
            self.depth_max.is_finite() && self.depth_max > 0.0,
            "depthMax",
            "must be positive",
        )?;
        check(
            self.depth_miss_slack.is_finite() && self.depth_miss_slack >= 0.0,
            "depthMissSlack",
            "must be non-negative",
        )?;
        check(self.max_targets >= 1, "maxTargets", "must be at least 1")?;
        check(self.max_swipes >= 1, "maxSwipes", "must be at least 1")?;
        check(self.max_events >= 1, "maxEvents", "must be at least 1")?;
        Ok(())
    }
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

/// Why a config document was rejected.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    Parse(serde_json::Error),
    /// A field value fails a semantic bound.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "config parse error: {}", err),
            ConfigError::Invalid { field, reason } => {
                write!(f, "config field {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_camel_case_fields() {
        let json = r#"{
            "spawnIntervalMs": 800,
            "hitRadiusPx": 65.5,
            "breakComboOnMiss": false
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.spawn_interval_ms, 800.0);
        assert_eq!(config.hit_radius_px, 65.5);
        assert!(!config.break_combo_on_miss);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config = EngineConfig::from_json(r#"{ "timingWindowMs": 150 }"#).unwrap();
        assert_eq!(config.timing_window_ms, 150.0);
        assert_eq!(config.approach_duration_ms, 3000.0);
        assert_eq!(config.max_targets, 16);
    }

    #[test]
    fn empty_document_is_the_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config.hit_radius_px, EngineConfig::default().hit_radius_px);
    }

    #[test]
    fn rejects_non_positive_durations() {
        assert!(EngineConfig::from_json(r#"{ "timingWindowMs": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "approachDurationMs": -100 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "spawnIntervalMs": 0 }"#).is_err());
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        assert!(EngineConfig::from_json(r#"{ "minLimbConfidence": 1.5 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "minLimbConfidence": -0.1 }"#).is_err());
    }

    #[test]
    fn rejects_margin_that_swallows_the_world() {
        let json = r#"{ "worldWidth": 100, "worldHeight": 100, "spawnMarginPx": 50 }"#;
        assert!(EngineConfig::from_json(json).is_err());
    }

    #[test]
    fn rejects_zero_capacities() {
        assert!(EngineConfig::from_json(r#"{ "maxTargets": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "maxSwipes": 0 }"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn error_display_names_the_field() {
        let err = EngineConfig::from_json(r#"{ "hitRadiusPx": -1 }"#).unwrap_err();
        assert!(err.to_string().contains("hitRadiusPx"), "got: {}", err);
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = EngineConfig::from_json(&json).unwrap();
        assert_eq!(back.max_combo_multiplier, config.max_combo_multiplier);
        assert_eq!(back.break_combo_on_miss, config.break_combo_on_miss);
    }
}
