//! Various utility functions.
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro64StarStar;

use crate::player::WDL;

pub mod board_gen;
pub mod game_stats;

/// A fixed-seed RNG for reproducible tests and examples.
pub fn consistent_rng() -> impl Rng {
    Xoroshiro64StarStar::seed_from_u64(0)
}

/// Elo difference estimated from a match tally. `wdl` doesn't have to be normalized.
pub fn elo_from_wdl(wdl: WDL<f32>) -> f32 {
    let score = (wdl.value() / wdl.sum() + 1.0) / 2.0;
    let elo = -400.0 * (1.0 / score - 1.0).log10();

    // fix annoying negative zero case
    elo + 0.0
}
