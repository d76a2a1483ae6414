//! Board evaluation, shared by the search agents.
use std::fmt::Debug;

use crate::board::{GoBoard, Tile};
use crate::player::Player;

/// Maps a board to a scalar utility from the POV of `pov`.
///
/// Implementations must be total (never fail, never return NaN), bounded by a
/// constant multiple of the board area, and antisymmetric:
/// `evaluate(board, pov) == -evaluate(board, pov.other())`. Antisymmetry is what
/// lets negamax-style searches alternate sides by negating the child value.
pub trait Evaluator: Debug {
    fn evaluate(&self, board: &GoBoard, pov: Player) -> f32;
}

/// The exact area-score differential. The default evaluator: at a terminal board
/// this is the true utility the game is decided by.
#[derive(Debug, Copy, Clone, Default)]
pub struct ScoreDiff;

impl Evaluator for ScoreDiff {
    fn evaluate(&self, board: &GoBoard, pov: Player) -> f32 {
        let score = board.score();
        score.for_player(pov) as f32 - score.for_player(pov.other()) as f32
    }
}

/// A cheap heuristic: stone differential plus a fraction of the liberty
/// differential as a mobility proxy. Faster than [`ScoreDiff`] because it skips
/// the territory flood fill, at the price of ignoring surrounded territory.
#[derive(Debug, Copy, Clone)]
pub struct StonesAndLiberties {
    pub liberty_weight: f32,
}

impl Default for StonesAndLiberties {
    fn default() -> Self {
        StonesAndLiberties { liberty_weight: 0.25 }
    }
}

impl StonesAndLiberties {
    /// Count of distinct empty points adjacent to at least one of `player`'s stones.
    fn liberty_count(board: &GoBoard, player: Player) -> u32 {
        Tile::all(board.size())
            .filter(|&tile| {
                board.stone_at(tile).is_none()
                    && tile
                        .all_adjacent(board.size())
                        .any(|adj| board.stone_at(adj) == Some(player))
            })
            .count() as u32
    }
}

impl Evaluator for StonesAndLiberties {
    fn evaluate(&self, board: &GoBoard, pov: Player) -> f32 {
        let stones = board.stone_count_of(pov) as f32 - board.stone_count_of(pov.other()) as f32;
        let liberties =
            Self::liberty_count(board, pov) as f32 - Self::liberty_count(board, pov.other()) as f32;
        stones + self.liberty_weight * liberties
    }
}
