//! Utilities to generate a [`GoBoard`] in a known or random state.
use rand::Rng;

use crate::board::{GoBoard, Move};
use crate::error::BoardDone;

/// Play the given moves, starting from `start`.
pub fn board_with_moves(start: GoBoard, moves: &[Move]) -> GoBoard {
    let mut curr = start;
    for &mv in moves {
        assert!(!curr.is_done(), "Board already done, playing {} on {:?}", mv, curr);
        assert_eq!(
            curr.is_available_move(mv),
            Ok(true),
            "Move not available, playing {} on {:?}",
            mv,
            curr
        );
        curr.play(mv).unwrap();
    }
    curr
}

/// Generate a board by playing `n` random moves on `start`.
/// Restarts from scratch if the game ends before `n` moves were played.
pub fn random_board_with_moves(start: &GoBoard, n: u32, rng: &mut impl Rng) -> GoBoard {
    'new_try: loop {
        let mut board = start.clone();
        for _ in 0..n {
            match board.play_random_available_move(rng) {
                Ok(()) => {}
                Err(BoardDone) => continue 'new_try,
            }
        }
        return board;
    }
}
