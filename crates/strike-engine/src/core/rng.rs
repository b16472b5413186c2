//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic, fast, no-std compatible. Drives target spawn placement so
//! a seeded session replays identically.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Generate a random float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits give a uniform mantissa-sized sample.
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    /// Generate a random float in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Pick a random element from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_int(items.len() as u32) as usize)
    }
}
