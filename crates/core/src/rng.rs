//! RNG module - seedable deck shuffling
//!
//! Wraps a seeded [`StdRng`] so that a session can be replayed exactly from
//! its seed. Shuffling is an explicit Fisher-Yates pass with unbiased range
//! sampling, so every permutation of a deck is equally likely.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seedable RNG used for dealing cards
#[derive(Debug, Clone)]
pub struct DeckRng {
    seed: u64,
    rng: StdRng,
}

impl DeckRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create an RNG from a fresh random seed (the seed stays readable for replays).
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this RNG was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate next random u64
    pub fn next_u64(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Generate random value in range [0, max)
    ///
    /// `max` must be non-zero.
    pub fn next_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range(i + 1);
            slice.swap(i, j);
        }
    }
}

impl Default for DeckRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = DeckRng::new(12345);
        let mut rng2 = DeckRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = DeckRng::new(12345);
        let mut rng2 = DeckRng::new(54321);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = DeckRng::new(7);
        for max in 1..20 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = DeckRng::new(99);
        let mut values: Vec<u32> = (0..16).collect();
        rng.shuffle(&mut values);

        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = DeckRng::new(3);
        let mut empty: [u8; 0] = [];
        rng.shuffle(&mut empty);

        let mut one = [42];
        rng.shuffle(&mut one);
        assert_eq!(one, [42]);
    }

    #[test]
    fn test_shuffle_covers_all_permutations_of_three() {
        let mut rng = DeckRng::new(2024);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..6000 {
            let mut v = [0u8, 1, 2];
            rng.shuffle(&mut v);
            *counts.entry(v).or_insert(0u32) += 1;
        }

        assert_eq!(counts.len(), 6);
        for (perm, count) in counts {
            // Expected 1000 each; a generous band keeps this stable.
            assert!((800..=1200).contains(&count), "{perm:?} seen {count} times");
        }
    }

    #[test]
    fn test_seed_is_kept() {
        assert_eq!(DeckRng::new(77).seed(), 77);
        let rng = DeckRng::from_entropy();
        let replay = DeckRng::new(rng.seed());
        assert_eq!(rng.seed(), replay.seed());
    }
}
