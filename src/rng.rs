//! Random source for generators
//!
//! All sequences draw from a [`GenRng`]. Unseeded sequences start from fresh
//! entropy; property checks record the seed they used so a failure can be
//! replayed, and `GENCHECK_SEED` pins that seed for a whole test process.

use std::env;

use log::warn;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub type GenRng = ChaCha8Rng;

/// Environment variable that fixes the seed of property checks
pub const SEED_ENV_VAR: &str = "GENCHECK_SEED";

pub fn from_entropy() -> GenRng {
    GenRng::from_entropy()
}

pub fn from_seed(seed: u64) -> GenRng {
    GenRng::seed_from_u64(seed)
}

/// Derive an independent generator from `rng`, advancing it.
pub fn fork(rng: &mut GenRng) -> GenRng {
    GenRng::seed_from_u64(rng.next_u64())
}

/// Seed pinned through the environment, if any.
pub fn seed_from_env() -> Option<u64> {
    let raw = env::var(SEED_ENV_VAR).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", SEED_ENV_VAR, raw, e);
            None
        }
    }
}

/// A seed for a new check: the pinned one, or a random one.
pub fn next_seed() -> u64 {
    seed_from_env().unwrap_or_else(|| rand::thread_rng().gen())
}
