use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generator used for landscapes and population dynamics.
pub type SimRng = Xoshiro256PlusPlus;

/// Create a generator from `seed`. A seed of 0 means "unseeded": the state is
/// drawn from the thread-local entropy source instead.
pub fn seeded_rng(seed: u64) -> SimRng {
    if seed == 0 {
        SimRng::from_seed(rand::rng().random())
    } else {
        SimRng::seed_from_u64(seed)
    }
}

/// Generator for population dynamics. Starts from the same seed as the
/// replication landscape but jumps 2^128 steps ahead, so the two streams never
/// overlap.
pub fn run_rng(seed: u64) -> SimRng {
    let mut rng = seeded_rng(seed);
    rng.jump();
    rng
}

/// Draw a fresh non-zero seed, for runs configured without one.
pub fn fresh_seed() -> u64 {
    rand::rng().random_range(1..=u64::from(u32::MAX))
}
