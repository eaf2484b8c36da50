use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Per-session hint allowance. `used + remaining` always equals the
/// allotment the session started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HintPool {
    remaining: u32,
    used: u32,
}

impl HintPool {
    pub fn new(allotment: u32) -> Self {
        Self {
            remaining: allotment,
            used: 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn allotment(&self) -> u32 {
        self.remaining + self.used
    }

    /// Take one hint if any are left
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.used += 1;
        true
    }
}

/// Options a hint may still remove: wrong and not yet eliminated
pub fn eliminable(option_count: usize, correct_index: usize, eliminated: &[usize]) -> Vec<usize> {
    (0..option_count)
        .filter(|i| *i != correct_index && !eliminated.contains(i))
        .collect()
}

/// Pick uniformly one wrong option to eliminate. Never returns the correct
/// option; `None` once every wrong option is gone.
pub fn choose_elimination<R: Rng + ?Sized>(
    option_count: usize,
    correct_index: usize,
    eliminated: &[usize],
    rng: &mut R,
) -> Option<usize> {
    eliminable(option_count, correct_index, eliminated)
        .choose(rng)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_accounting() {
        let mut pool = HintPool::new(3);
        assert_eq!(pool.allotment(), 3);
        assert!(pool.take());
        assert!(pool.take());
        assert!(pool.take());
        assert!(!pool.take());
        assert_eq!(pool.used(), 3);
        assert_eq!(pool.remaining(), 0);
        assert_eq!(pool.allotment(), 3);
    }

    #[test]
    fn test_zero_allotment() {
        let mut pool = HintPool::new(0);
        assert!(!pool.take());
        assert_eq!(pool.used(), 0);
    }

    #[test]
    fn test_elimination_never_hits_correct_option() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let correct = (seed % 4) as usize;
            let mut eliminated = Vec::new();
            while let Some(i) = choose_elimination(4, correct, &eliminated, &mut rng) {
                assert_ne!(i, correct);
                assert!(!eliminated.contains(&i));
                eliminated.push(i);
            }
            assert_eq!(eliminated.len(), 3);
        }
    }

    #[test]
    fn test_eliminable() {
        assert_eq!(eliminable(4, 2, &[0]), vec![1, 3]);
        assert!(eliminable(2, 0, &[1]).is_empty());
    }
}
