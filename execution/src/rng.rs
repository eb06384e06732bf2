//! Randomness used to resolve rounds.
//!
//! Winner selection goes through [`OutcomeSource`] so callers decide where entropy comes
//! from: any [`rand::RngCore`] works directly, and tests can script exact picks.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Picks an index uniformly from `0..len`. `len` is always at least one.
pub trait OutcomeSource {
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RngCore> OutcomeSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Reproducible generator when `seed` is given, otherwise seeded from OS entropy.
pub fn outcome_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = outcome_rng(Some(7));
        let mut b = outcome_rng(Some(7));
        let picks_a: Vec<_> = (0..32).map(|_| a.pick(4)).collect();
        let picks_b: Vec<_> = (0..32).map(|_| b.pick(4)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&p| p < 4));
    }

    #[test]
    fn test_every_index_reachable() {
        let mut rng = outcome_rng(Some(1));
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[rng.pick(3)] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
