//! RNG module - injectable randomness
//!
//! Every random decision (layout kinds, refill kinds, density rolls, revive
//! and flush victims) goes through [`RandomSource`], so callers can swap in
//! a scripted source and assert exact outcomes.
//!
//! Two sources ship with the crate:
//! - [`SimpleRng`]: a seeded LCG for deterministic play
//! - [`SequenceRng`]: replays a fixed list of values, for tests

/// Source of randomness used by the engine.
pub trait RandomSource {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a value in `[0, max)`; returns 0 when `max` is 0.
    ///
    /// Uses the high bits of [`next_u32`](Self::next_u32), which are the
    /// well-distributed ones for an LCG.
    fn next_below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Roll a `percent`-in-100 chance
    fn chance_percent(&mut self, percent: u32) -> bool {
        self.next_below(100) < percent
    }

    /// Pick one element uniformly
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_below(items.len() as u32) as usize)
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.next_below((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Choose `count` distinct elements (all of them if `count` is larger)
    fn sample<T: Copy>(&mut self, items: &[T], count: usize) -> Vec<T>
    where
        Self: Sized,
    {
        let mut pool = items.to_vec();
        let count = count.min(pool.len());
        // Partial Fisher-Yates: the first `count` slots end up uniformly chosen.
        for i in 0..count {
            let j = i + self.next_below((pool.len() - i) as u32) as usize;
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_below(&mut self, max: u32) -> u32 {
        (**self).next_below(max)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current state; feeding it back into [`SimpleRng::new`] resumes the sequence.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// `next_below(max)` yields `value % max`, so a script reads as the list of
/// choices the engine will make: with kinds `[particle, microbe]`, the script
/// `[1, 0, 0]` refills microbe, particle, particle.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always produce the same value
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }

    fn next_below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_next_below_stays_in_range() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_below(3) < 3);
        }
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn test_two_way_choice_is_not_alternating() {
        // Low LCG bits alternate; the high-bit mapping must not.
        let mut rng = SimpleRng::new(99);
        let picks: Vec<u32> = (0..32).map(|_| rng.next_below(2)).collect();
        let alternating = picks.windows(2).all(|w| w[0] != w[1]);
        assert!(!alternating);
    }

    #[test]
    fn test_sequence_rng_cycles() {
        let mut rng = SequenceRng::new(vec![4, 1]);
        assert_eq!(rng.next_below(3), 1);
        assert_eq!(rng.next_below(3), 1);
        assert_eq!(rng.next_below(3), 1);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let mut rng = SimpleRng::new(5);
        let items: Vec<u32> = (0..20).collect();
        let mut picked = rng.sample(&items, 7);
        assert_eq!(picked.len(), 7);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 7);

        assert_eq!(rng.sample(&items[..3], 10).len(), 3);
    }

    #[test]
    fn test_pick_on_empty_slice() {
        let mut rng = SimpleRng::new(5);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[9u8]), Some(&9));
    }
}
