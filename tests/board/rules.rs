use baduk_ai::board::{GoBoard, Move, State, Tile};
use baduk_ai::error::PlayError;
use baduk_ai::player::{Outcome, Player};
use baduk_ai::util::board_gen::{board_with_moves, random_board_with_moves};
use baduk_ai::util::game_stats::perft_naive;
use baduk_ai::util::consistent_rng;

use crate::board::{go_board_test_main, go_board_test_main_uniform, print_board_with_moves};

fn place(x: u8, y: u8) -> Move {
    Move::Place(Tile::new(x, y))
}

#[test]
fn empty_board() {
    let board = GoBoard::new(5);

    assert_eq!(board.next_player(), Player::Black);
    assert_eq!(board.state(), State::Normal);
    assert_eq!(board.outcome(), None);
    assert!(!board.is_terminal());
    assert_eq!(board.move_number(), 0);

    go_board_test_main_uniform(&board);
}

#[test]
fn capture_corner() {
    let start = GoBoard::new(5);
    let moves = [place(0, 1), place(0, 0), place(1, 0)];

    let board = print_board_with_moves(start, &moves);
    assert_eq!(board.stone_at(Tile::new(0, 0)), None);
    assert_eq!(board.stone_count_of(Player::White), 0);
    assert_eq!(board.stone_count_of(Player::Black), 2);

    go_board_test_main(&board);
}

#[test]
fn capture_surrounded_stone() {
    // single white stone with four black neighbors on 9x9, black completes the capture
    let fen = "........./........./........./....b..../...bw..../....b..../........./........./......... b 0";
    let board = GoBoard::from_fen(fen).unwrap();

    let after = board.clone_and_play(place(5, 4)).unwrap();
    assert_eq!(after.stone_at(Tile::new(4, 4)), None);
    assert_eq!(after.stone_count_of(Player::White), 0);
    assert_eq!(after.stone_count_of(Player::Black), 5);

    go_board_test_main(&after);
}

#[test]
fn capture_group() {
    // the whole two-stone white group dies at once when its last liberty is filled
    let board = GoBoard::from_fen("...../.bb../bww../.bb../..... b 0").unwrap();

    let after = board.clone_and_play(place(3, 2)).unwrap();
    assert_eq!(after.stone_count_of(Player::White), 0);
    assert_eq!(after.stone_count_of(Player::Black), 6);

    go_board_test_main(&after);
}

#[test]
fn suicide_rejected() {
    let board = GoBoard::from_fen("...../...../...../w..../.w... b 0").unwrap();

    assert_eq!(board.is_available_move(place(0, 0)), Ok(false));
    assert_eq!(board.clone().play(place(0, 0)), Err(PlayError::Suicide));

    // the surrounding white stones keep their liberties, so this is not a capture
    go_board_test_main(&board);
}

#[test]
fn filling_own_last_liberty_is_legal_when_it_captures() {
    // black filling (0,0) would have no liberties of its own, but it takes the
    // white stone's last liberty first, so it is a capture and not suicide
    let board = GoBoard::from_fen("...../...../b..../wb.../.b... b 0").unwrap();

    let after = board.clone_and_play(place(0, 0)).unwrap();
    assert_eq!(after.stone_at(Tile::new(0, 1)), None);
    assert_eq!(after.stone_count_of(Player::White), 0);

    go_board_test_main(&after);
}

#[test]
fn occupied_and_out_of_bounds() {
    let board = board_with_moves(GoBoard::new(5), &[place(2, 2)]);

    assert_eq!(board.clone().play(place(2, 2)), Err(PlayError::Occupied));
    assert_eq!(board.is_available_move(place(2, 2)), Ok(false));
    assert_eq!(board.clone().play(Move::Place(Tile::new(6, 6))), Err(PlayError::OutOfBounds));
    assert_eq!(board.is_available_move(Move::Place(Tile::new(6, 6))), Ok(false));
}

#[test]
fn simple_ko() {
    // classic ko shape: black captures at (2,1), white may not recapture at (1,1)
    // immediately, but may after an exchange elsewhere
    let board = GoBoard::from_fen("...../...../.bw../bw.w./.bw.. b 0").unwrap();

    let board = board.clone_and_play(place(2, 1)).unwrap();
    assert_eq!(board.stone_at(Tile::new(1, 1)), None, "ko capture must remove the stone");

    // immediate recapture recreates the previous position
    assert_eq!(board.is_available_move(place(1, 1)), Ok(false));
    assert_eq!(board.clone().play(place(1, 1)), Err(PlayError::Ko));
    go_board_test_main(&board);

    // after an intervening exchange the same point is legal again
    let board = board_with_moves(board, &[place(4, 4), place(4, 0)]);
    assert_eq!(board.is_available_move(place(1, 1)), Ok(true));
    let board = board.clone_and_play(place(1, 1)).unwrap();
    assert_eq!(board.stone_at(Tile::new(2, 1)), None, "recapture must work now");

    go_board_test_main(&board);
}

#[test]
fn double_pass_ends_game() {
    let start = GoBoard::new(5);

    let passed = start.clone_and_play(Move::Pass).unwrap();
    assert_eq!(passed.state(), State::Passed);
    assert_eq!(passed.outcome(), None);
    assert_eq!(passed.next_player(), Player::White);

    let done = passed.clone_and_play(Move::Pass).unwrap();
    assert_eq!(done.outcome(), Some(Outcome::Draw));
    assert!(done.is_terminal());

    go_board_test_main(&done);
}

#[test]
fn placement_resets_pass_state() {
    let board = board_with_moves(GoBoard::new(5), &[Move::Pass, place(2, 2), Move::Pass]);
    assert_eq!(board.state(), State::Passed);

    let board = board.clone_and_play(place(1, 1)).unwrap();
    assert_eq!(board.state(), State::Normal);
    assert_eq!(board.outcome(), None);
}

#[test]
fn no_placement_is_terminal_but_not_done() {
    // on a 1x1 board the only placement is suicide, so neither side can ever place
    let board = GoBoard::new(1);

    assert_eq!(board.clone().play(place(0, 0)), Err(PlayError::Suicide));
    let available: Vec<Move> = {
        use internal_iterator::InternalIterator;
        board.available_moves().unwrap().collect()
    };
    assert_eq!(available, vec![Move::Pass]);

    assert!(board.is_terminal());
    assert_eq!(board.outcome(), None, "terminal without outcome until both pass");
}

#[test]
fn play_on_done_board_fails() {
    let board = board_with_moves(GoBoard::new(3), &[Move::Pass, Move::Pass]);
    assert!(board.is_done());

    assert_eq!(board.clone().play(Move::Pass), Err(PlayError::BoardDone));
    assert_eq!(board.clone().play(place(0, 0)), Err(PlayError::BoardDone));
}

#[test]
fn legality_soundness_random_boards() {
    // play/is_available/available_moves must agree on boards from all game stages
    let mut rng = consistent_rng();
    let start = GoBoard::new(5);

    for n in [1, 3, 7, 12, 20, 35] {
        let board = random_board_with_moves(&start, n, &mut rng);
        go_board_test_main(&board);
    }
}

#[test]
fn perft() {
    let cases_2 = [1, 5, 21];
    let cases_3 = [1, 10, 91];

    for (depth, &expected) in cases_2.iter().enumerate() {
        assert_eq!(perft_naive(&GoBoard::new(2), depth as u32), expected, "2x2 depth {}", depth);
    }
    for (depth, &expected) in cases_3.iter().enumerate() {
        assert_eq!(perft_naive(&GoBoard::new(3), depth as u32), expected, "3x3 depth {}", depth);
    }
}
