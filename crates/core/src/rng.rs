//! Owned pseudo-random source.
//!
//! Every game receives its own [`SimpleRng`] at init instead of reseeding a
//! process-wide generator, so a fixed seed replays a game exactly.

use std::time::{SystemTime, UNIX_EPOCH};

/// 32-bit linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;

impl SimpleRng {
    /// A zero seed is replaced by 1.
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Seed from the wall clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(1);
        Self::new(nanos)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform-ish value in `0..max`; 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Low bits of an LCG cycle with short periods; scale the high bits.
        (((self.next_u32() >> 16) as u64 * max as u64) >> 16) as u32
    }

    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }

    /// One element of `items`, `None` when empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_index(items.len()))
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
