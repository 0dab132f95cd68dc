//! Deterministic per-column RNG hierarchy.
//!
//! A call-level master seed is expanded into one ChaCha8 stream per
//! `(stream tag, column)` pair. Column seeds are the BLAKE3 digest of the
//! master seed, the tag and the column index, so they do not depend on the
//! order in which columns are processed and column-parallel runs are
//! bit-identical to sequential ones.
//!
//! This is a compatibility boundary: ChaCha8 (rand_chacha 0.3) seeded with the
//! full 32-byte digest. Changing either breaks reproducibility of seeded output.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stream tag for random placement over whole columns.
pub const STREAM_RANDOM: &str = "generate_random";
/// Stream tag for random placement after existing signals.
pub const STREAM_RANDOM_AFTER: &str = "generate_random_after";
/// Stream tag for per-column shuffles.
pub const STREAM_SHUFFLE: &str = "shuffle";

/// Master seed plus derivation of per-column generators.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Explicit seed if given, otherwise a fresh one from OS entropy.
    ///
    /// The entropy draw is local to this call; there is no shared generator.
    pub fn from_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::new(ChaCha8Rng::from_entropy().next_u64()),
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// 32-byte seed for one `(stream, col)` pair.
    pub fn sub_seed(&self, stream: &str, col: u64) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(stream.as_bytes());
        hasher.update(&col.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Seeded ChaCha8 generator for one `(stream, col)` pair.
    pub fn rng_for(&self, stream: &str, col: usize) -> ChaCha8Rng {
        ChaCha8Rng::from_seed(self.sub_seed(stream, col as u64))
    }
}
