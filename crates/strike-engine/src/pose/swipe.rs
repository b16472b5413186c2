//! Swipe recognition: turns two consecutive wrist observations into a
//! directional swipe event, and keeps a short bounded history of events
//! for the hit resolver to search.

use crate::core::geom::{velocity_per_frame, Direction8};
use crate::pose::frame::{Limb, WristSample};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A detected directional limb movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeEvent {
    pub limb: Limb,
    pub direction: Direction8,
    /// Speed in world units per 60 Hz reference frame.
    pub velocity: f32,
    /// Total displacement between the two frames, in world pixels.
    pub displacement: f32,
    /// Game time when the swipe was recognized, in ms.
    pub at_ms: f64,
}

/// Direction and speed of a wrist movement, before it is stamped with a
/// limb and a game timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeMotion {
    pub direction: Direction8,
    pub velocity: f32,
    pub displacement: f32,
}

/// Classify the movement between two consecutive wrist observations.
///
/// Pure function. Returns None when the movement is too small to be
/// deliberate (displacement under `min_displacement`), too slow (velocity
/// not exceeding `min_velocity`), or when the capture timestamps yield no
/// usable elapsed time.
pub fn detect_swipe(
    prev: WristSample,
    curr: WristSample,
    min_displacement: f32,
    min_velocity: f32,
) -> Option<SwipeMotion> {
    let delta = curr.pos - prev.pos;
    let displacement = delta.length();
    if displacement < min_displacement {
        return None;
    }
    let elapsed_ms = curr.captured_at_ms - prev.captured_at_ms;
    let velocity = velocity_per_frame(displacement, elapsed_ms)?;
    if velocity <= min_velocity {
        return None;
    }
    let direction = Direction8::from_vector(delta)?;
    Some(SwipeMotion {
        direction,
        velocity,
        displacement,
    })
}

/// Bounded history of recent swipe events, newest at the back.
///
/// Two defenses against unbounded growth: events older than the resolver's
/// recency window are pruned every update, and the buffer is capacity-capped
/// with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct SwipeBuffer {
    events: VecDeque<SwipeEvent>,
    capacity: usize,
}

impl SwipeBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: SwipeEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Drop events older than `max_age_ms` relative to `now_ms`.
    pub fn prune_older_than(&mut self, now_ms: f64, max_age_ms: f64) {
        while let Some(front) = self.events.front() {
            if now_ms - front.at_ms > max_age_ms {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    /// Most recent event on `limb` in `direction` within the recency window.
    pub fn latest_match(
        &self,
        limb: Limb,
        direction: Direction8,
        now_ms: f64,
        recency_ms: f64,
    ) -> Option<&SwipeEvent> {
        self.events
            .iter()
            .rev()
            .take_while(|e| now_ms - e.at_ms <= recency_ms)
            .find(|e| e.limb == limb && e.direction == direction)
    }

    /// Shrink capacity on config hot-swap, evicting oldest events first.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwipeEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geom::REFERENCE_FRAME_MS;
    use glam::Vec2;

    fn sample(x: f32, y: f32, at: f64) -> WristSample {
        WristSample {
            pos: Vec2::new(x, y),
            captured_at_ms: at,
        }
    }

    fn event(limb: Limb, direction: Direction8, at_ms: f64) -> SwipeEvent {
        SwipeEvent {
            limb,
            direction,
            velocity: 30.0,
            displacement: 30.0,
            at_ms,
        }
    }

    #[test]
    fn detects_fast_rightward_swipe() {
        let prev = sample(100.0, 100.0, 1000.0);
        let curr = sample(130.0, 100.0, 1000.0 + REFERENCE_FRAME_MS);
        let motion = detect_swipe(prev, curr, 20.0, 15.0).expect("should detect");
        assert_eq!(motion.direction, Direction8::Right);
        assert!((motion.velocity - 30.0).abs() < 1e-3, "velocity {}", motion.velocity);
        assert!((motion.displacement - 30.0).abs() < 1e-3);
    }

    #[test]
    fn small_movement_is_not_a_swipe() {
        let prev = sample(100.0, 100.0, 1000.0);
        let curr = sample(110.0, 100.0, 1016.0); // 10 px, under the 20 px floor
        assert_eq!(detect_swipe(prev, curr, 20.0, 15.0), None);
    }

    #[test]
    fn slow_movement_is_not_a_swipe() {
        let prev = sample(100.0, 100.0, 1000.0);
        // 30 px spread over 100 ms is only ~5 units per reference frame.
        let curr = sample(130.0, 100.0, 1100.0);
        assert_eq!(detect_swipe(prev, curr, 20.0, 15.0), None);
    }

    #[test]
    fn velocity_at_exactly_the_threshold_is_rejected() {
        let prev = sample(0.0, 0.0, 0.0);
        let curr = sample(15.0, 0.0, REFERENCE_FRAME_MS);
        // displacement floor of 10 passes; velocity lands exactly on 15
        assert_eq!(detect_swipe(prev, curr, 10.0, 15.0), None);
    }

    #[test]
    fn duplicate_timestamp_yields_nothing() {
        let prev = sample(100.0, 100.0, 1000.0);
        let curr = sample(200.0, 100.0, 1000.0);
        assert_eq!(detect_swipe(prev, curr, 20.0, 15.0), None);
    }

    #[test]
    fn diagonal_swipe_buckets_correctly() {
        let prev = sample(100.0, 100.0, 1000.0);
        // up-left on screen: -x, -y
        let curr = sample(70.0, 70.0, 1000.0 + REFERENCE_FRAME_MS);
        let motion = detect_swipe(prev, curr, 20.0, 15.0).expect("should detect");
        assert_eq!(motion.direction, Direction8::UpLeft);
    }

    #[test]
    fn buffer_caps_at_capacity() {
        let mut buffer = SwipeBuffer::new(3);
        for i in 0..5 {
            buffer.push(event(Limb::Left, Direction8::Right, i as f64 * 100.0));
        }
        assert_eq!(buffer.len(), 3);
        // Oldest two were evicted.
        assert!((buffer.iter().next().unwrap().at_ms - 200.0).abs() < 1e-9);
    }

    #[test]
    fn buffer_prunes_by_age() {
        let mut buffer = SwipeBuffer::new(8);
        buffer.push(event(Limb::Left, Direction8::Right, 100.0));
        buffer.push(event(Limb::Left, Direction8::Up, 500.0));
        buffer.prune_older_than(900.0, 300.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.iter().next().unwrap().direction, Direction8::Up);
    }

    #[test]
    fn latest_match_prefers_newest() {
        let mut buffer = SwipeBuffer::new(8);
        buffer.push(event(Limb::Left, Direction8::Right, 100.0));
        buffer.push(event(Limb::Left, Direction8::Right, 200.0));
        let found = buffer
            .latest_match(Limb::Left, Direction8::Right, 250.0, 300.0)
            .expect("should match");
        assert_eq!(found.at_ms, 200.0);
    }

    #[test]
    fn latest_match_respects_recency_window() {
        let mut buffer = SwipeBuffer::new(8);
        buffer.push(event(Limb::Right, Direction8::Down, 100.0));
        assert!(buffer
            .latest_match(Limb::Right, Direction8::Down, 500.0, 300.0)
            .is_none());
        assert!(buffer
            .latest_match(Limb::Right, Direction8::Down, 350.0, 300.0)
            .is_some());
    }

    #[test]
    fn latest_match_filters_limb_and_direction() {
        let mut buffer = SwipeBuffer::new(8);
        buffer.push(event(Limb::Left, Direction8::Right, 100.0));
        assert!(buffer
            .latest_match(Limb::Right, Direction8::Right, 150.0, 300.0)
            .is_none());
        assert!(buffer
            .latest_match(Limb::Left, Direction8::Left, 150.0, 300.0)
            .is_none());
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let mut buffer = SwipeBuffer::new(4);
        for i in 0..4 {
            buffer.push(event(Limb::Left, Direction8::Right, i as f64));
        }
        buffer.set_capacity(2);
        assert_eq!(buffer.len(), 2);
        assert!((buffer.iter().next().unwrap().at_ms - 2.0).abs() < 1e-9);
    }
}
