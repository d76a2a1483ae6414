//! Utilities for collecting game statistics and testing the board implementation.
use internal_iterator::InternalIterator;

use crate::board::GoBoard;

/// The number of move sequences of length `depth`, including transpositions.
/// See <https://www.chessprogramming.org/Perft>.
pub fn perft_naive(board: &GoBoard, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    if board.is_done() {
        return 0;
    }

    let mut p = 0;
    board.available_moves().unwrap().for_each(|mv| {
        p += perft_naive(&board.clone_and_play(mv).unwrap(), depth - 1);
    });
    p
}
