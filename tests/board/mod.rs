use std::collections::HashSet;

use internal_iterator::InternalIterator;

use baduk_ai::board::{GoBoard, Move, Tile, Zobrist};
use baduk_ai::error::BoardDone;
use baduk_ai::util::consistent_rng;

use crate::util::test_sampler_uniform;

mod rules;

pub fn go_board_test_main(board: &GoBoard) {
    go_board_test_main_impl(board, false)
}

pub fn go_board_test_main_uniform(board: &GoBoard) {
    go_board_test_main_impl(board, true)
}

fn go_board_test_main_impl(board: &GoBoard, random_uniform: bool) {
    println!("Currently testing board\n{:?}\n{}", board, board);

    if board.is_done() {
        test_done_board_errors(board);
    } else {
        test_available_match(board);

        if random_uniform {
            test_random_available_uniform(board);
        }
    }

    test_zobrist_consistent(board);
}

fn all_moves(size: u8) -> Vec<Move> {
    let mut moves = vec![Move::Pass];
    moves.extend(Tile::all(size).map(Move::Place));
    moves
}

fn test_done_board_errors(board: &GoBoard) {
    assert!(board.is_done(), "bug in test implementation, expected done board");

    assert!(matches!(board.available_moves(), Err(BoardDone)));
    assert!(board.random_available_move(&mut consistent_rng()).is_err());

    for mv in all_moves(board.size()) {
        assert!(board.is_available_move(mv).is_err());
        assert!(board.clone().play(mv).is_err());
    }
}

fn test_available_match(board: &GoBoard) {
    let available: Vec<Move> = board.available_moves().unwrap().collect();
    let available_count = board.available_moves().unwrap().count();

    assert_eq!(available.len(), available_count, "available_moves count mismatch");
    assert!(
        !available.is_empty(),
        "must have at least one available move for a non-done board"
    );
    assert_eq!(available[0], Move::Pass, "pass must always be available and come first");

    // availability, generation and play must agree on every move
    for mv in all_moves(board.size()) {
        let is_available = board.is_available_move(mv).unwrap();
        let was_generated = available.contains(&mv);
        let plays = board.clone().play(mv);

        assert_eq!(is_available, was_generated, "generation mismatch for {:?}", mv);
        assert_eq!(is_available, plays.is_ok(), "play mismatch for {:?} ({:?})", mv, plays);
    }

    // check that there are no duplicates
    assert_eq!(
        available.len(),
        HashSet::<Move>::from_iter(available.iter().copied()).len(),
        "Found duplicate move"
    );

    // ordering must be deterministic
    let again: Vec<Move> = board.available_moves().unwrap().collect();
    assert_eq!(available, again, "move ordering must be deterministic");
}

/// Recompute the stone hash from scratch and compare it to the incremental one.
fn test_zobrist_consistent(board: &GoBoard) {
    let mut expected = Zobrist::default();
    for tile in Tile::all(board.size()) {
        if let Some(player) = board.stone_at(tile) {
            expected ^= Zobrist::for_stone(player, tile);
        }
    }
    assert_eq!(expected, board.zobrist(), "incremental zobrist out of sync");
}

fn test_random_available_uniform(board: &GoBoard) {
    assert!(!board.is_done(), "invalid board to test");

    let expected: Vec<Move> = board.available_moves().unwrap().collect();
    let mut rng = consistent_rng();
    test_sampler_uniform(&expected, || board.random_available_move(&mut rng).unwrap());
}

pub fn print_board_with_moves(start: GoBoard, moves: &[Move]) -> GoBoard {
    let mut board = start;
    println!("{}", board);

    for &mv in moves {
        println!("Playing {}", mv);
        board.play(mv).unwrap();
        println!("{}", board);
    }

    board
}
