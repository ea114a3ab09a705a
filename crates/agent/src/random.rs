//! Random sources for the composer's variety seam.

use campusbuddy_core::random::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Thread-local entropy. The default in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::rng().random_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::rng().random_bool(p.clamp(0.0, 1.0))
    }
}

/// A seeded generator: the same seed replays the same replies.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }
}

/// Always the first option, never an embellishment.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoice;

impl RandomSource for FirstChoice {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }

    fn chance(&mut self, _p: f64) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_stay_in_range() {
        let mut thread = ThreadRandom;
        let mut seeded = SeededRandom::new(7);
        for len in 1..20 {
            assert!(thread.pick(len) < len);
            assert!(seeded.pick(len) < len);
        }
        assert_eq!(thread.pick(0), 0);
        assert_eq!(seeded.pick(0), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let xs: Vec<usize> = (0..16).map(|_| a.pick(100)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.pick(100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn chance_extremes_are_certain() {
        let mut seeded = SeededRandom::new(1);
        assert!((0..32).all(|_| seeded.chance(1.0)));
        assert!((0..32).all(|_| !seeded.chance(0.0)));
        // out-of-range probabilities are clamped rather than rejected
        assert!(seeded.chance(2.0));
        assert!(!ThreadRandom.chance(-1.0));
    }

    #[test]
    fn first_choice_is_inert() {
        let mut first = FirstChoice;
        assert_eq!(first.pick(5), 0);
        assert!(!first.chance(1.0));
    }
}
