use rand::{rngs::OsRng, seq::SliceRandom, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One step of a randomized insert/erase workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Insert(i64),
    Erase(i64),
}

impl Op {
    pub fn key(&self) -> i64 {
        match *self {
            Op::Insert(k) | Op::Erase(k) => k,
        }
    }
}

/// A seeded generator of test workloads.
///
/// Uses the xoshiro256** PRNG so that a failing trace can be replayed from
/// its seed.
///
/// # Examples
///
/// ```
/// use ordered_tree_util::fuzzer::{Fuzzer, Op};
///
/// let fuzzer = Fuzzer::from_u64(7);
/// let trace = fuzzer.trace(100, (0, 50), 0.6);
/// assert_eq!(trace.len(), 100);
/// assert!(trace.iter().all(|op| (0..=50).contains(&op.key())));
/// assert_eq!(trace, Fuzzer::from_u64(7).trace(100, (0, 50), 0.6));
/// ```
pub struct Fuzzer {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: Arc<Mutex<Xoshiro256StarStar>>,
}

impl Fuzzer {
    /// Create a new fuzzer with an optional seed.
    ///
    /// If no seed is provided, a random seed will be generated using `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });

        let rng = Xoshiro256StarStar::from_seed(seed);

        Self {
            seed,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Create a fuzzer from a short numeric seed.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        for chunk in bytes.chunks_mut(8) {
            chunk.copy_from_slice(&seed.to_le_bytes());
        }
        Self::new(Some(bytes))
    }

    fn rng(&self) -> MutexGuard<'_, Xoshiro256StarStar> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate a random integer in the range [min, max] (inclusive).
    pub fn random_int(&self, min: i64, max: i64) -> i64 {
        self.rng().gen_range(min..=max)
    }

    /// Pick a random element from a slice.
    pub fn pick<'a, T>(&self, elements: &'a [T]) -> &'a T {
        let idx = self.rng().gen_range(0..elements.len());
        &elements[idx]
    }

    /// Generate a random boolean with the given probability of being true.
    pub fn random_bool(&self, probability: f64) -> bool {
        self.rng().gen_bool(probability)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.rng());
    }

    /// A random permutation of `0..n`.
    pub fn permutation(&self, n: usize) -> Vec<i64> {
        let mut keys: Vec<i64> = (0..n as i64).collect();
        self.shuffle(&mut keys);
        keys
    }

    /// `len` operations over keys in `[range.0, range.1]`; each one is an
    /// insert with probability `insert_probability`, an erase otherwise.
    pub fn trace(&self, len: usize, range: (i64, i64), insert_probability: f64) -> Vec<Op> {
        let mut rng = self.rng();
        (0..len)
            .map(|_| {
                let key = rng.gen_range(range.0..=range.1);
                if rng.gen_bool(insert_probability) {
                    Op::Insert(key)
                } else {
                    Op::Erase(key)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzer_random_int() {
        let fuzzer = Fuzzer::new(None);

        for _ in 0..100 {
            let n = fuzzer.random_int(1, 10);
            assert!((1..=10).contains(&n));
        }
    }

    #[test]
    fn test_fuzzer_pick() {
        let fuzzer = Fuzzer::new(None);
        let choices = vec!["a", "b", "c"];

        for _ in 0..100 {
            let picked = fuzzer.pick(&choices);
            assert!(choices.contains(picked));
        }
    }

    #[test]
    fn test_fuzzer_reproducible() {
        let fuzzer1 = Fuzzer::from_u64(42);
        let fuzzer2 = Fuzzer::from_u64(42);

        for _ in 0..10 {
            assert_eq!(fuzzer1.random_int(0, 1000), fuzzer2.random_int(0, 1000));
        }
        assert_eq!(fuzzer1.permutation(32), fuzzer2.permutation(32));
    }

    #[test]
    fn test_fuzzer_permutation_covers_range() {
        let fuzzer = Fuzzer::new(None);
        let mut keys = fuzzer.permutation(64);
        keys.sort_unstable();
        assert_eq!(keys, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_fuzzer_trace_mix() {
        let fuzzer = Fuzzer::from_u64(3);
        let trace = fuzzer.trace(1000, (-5, 5), 0.5);
        assert!(trace.iter().any(|op| matches!(op, Op::Insert(_))));
        assert!(trace.iter().any(|op| matches!(op, Op::Erase(_))));
        assert!(trace.iter().all(|op| (-5..=5).contains(&op.key())));

        let inserts_only = fuzzer.trace(50, (0, 9), 1.0);
        assert!(inserts_only.iter().all(|op| matches!(op, Op::Insert(_))));
    }

    #[test]
    fn test_fuzzer_random_bool() {
        let fuzzer = Fuzzer::new(None);

        let mut has_true = false;
        let mut has_false = false;

        for _ in 0..100 {
            if fuzzer.random_bool(0.5) {
                has_true = true;
            } else {
                has_false = true;
            }
        }

        assert!(has_true && has_false);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn random_int_stays_in_bounds(seed in any::<u64>(), lo in -1000i64..1000, span in 0i64..1000) {
                let fuzzer = Fuzzer::from_u64(seed);
                let n = fuzzer.random_int(lo, lo + span);
                prop_assert!((lo..=lo + span).contains(&n));
            }

            #[test]
            fn same_seed_same_trace(seed in any::<u64>(), len in 0usize..200) {
                prop_assert_eq!(
                    Fuzzer::from_u64(seed).trace(len, (0, 20), 0.5),
                    Fuzzer::from_u64(seed).trace(len, (0, 20), 0.5)
                );
            }
        }
    }
}
