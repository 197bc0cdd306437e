//! Random-source construction and the closed-interval uniform draw.
//!
//! Every explorer owns its random source as an explicit per-instance value;
//! nothing in kiln reaches for a process-global generator. `ChaCha12Rng` is
//! used throughout because its stream is stable for a given seed across
//! platforms and releases.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// The random source owned by each explorer instance.
pub type ExplorerRng = ChaCha12Rng;

/// Bits of resolution in [`closed_unit`].
const UNIT_BITS: u32 = 53;

/// Creates a reproducible random source from a seed.
pub fn seeded(seed: u64) -> ExplorerRng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Creates a random source from OS entropy.
///
/// Used by `clone_explorer` implementations: a fresh entropy-seeded source
/// is de-correlated from the origin's stream by construction.
pub fn entropy() -> ExplorerRng {
    ChaCha12Rng::from_os_rng()
}

/// Draws a uniform value over the closed interval [0, 1].
///
/// A 53-bit integer draw divided by 2^53 - 1, so both endpoints are
/// reachable - including exactly 1.0, which the standard half-open float
/// generator never produces.
pub fn closed_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    unit_from_bits(rng.random_range(0..(1u64 << UNIT_BITS)))
}

/// Maps a draw in [0, 2^53) onto the closed unit interval.
fn unit_from_bits(bits: u64) -> f64 {
    debug_assert!(bits < (1u64 << UNIT_BITS));
    bits as f64 / ((1u64 << UNIT_BITS) - 1) as f64
}
