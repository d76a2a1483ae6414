use baduk_ai::agent::minimax::{alpha_beta, minimax};
use baduk_ai::agent::{Agent, ExpectimaxAgent, GreedyAgent, MinimaxAgent, UniformOpponent};
use baduk_ai::board::{GoBoard, Move, Tile};
use baduk_ai::eval::{ScoreDiff, StonesAndLiberties};
use baduk_ai::util::board_gen::random_board_with_moves;
use baduk_ai::util::consistent_rng;

/// Single white stone in atari on 9x9: filling (5,4) captures it and is clearly
/// the best one-ply move under the exact score evaluator.
const CAPTURE_FEN: &str =
    "........./........./........./....b..../...bw..../....b..../........./........./......... b 0";

#[test]
fn alpha_beta_matches_minimax() {
    let mut rng = consistent_rng();
    let start = GoBoard::new(4);

    for n in [2, 4, 6, 9] {
        let board = random_board_with_moves(&start, n, &mut rng);
        if board.is_done() {
            continue;
        }

        for depth in 1..=3 {
            let plain = minimax(&board, &ScoreDiff, depth, &mut rng).unwrap();
            let pruned = alpha_beta(&board, &ScoreDiff, depth, &mut rng).unwrap();

            assert_eq!(
                plain.value, pruned.value,
                "value mismatch at depth {} on {:?}",
                depth, board
            );
            assert!(
                pruned.leaf_evals <= plain.leaf_evals,
                "pruning evaluated more leaves ({} > {}) at depth {} on {:?}",
                pruned.leaf_evals,
                plain.leaf_evals,
                depth,
                board
            );
        }
    }
}

#[test]
fn alpha_beta_matches_minimax_with_heuristic() {
    // the equivalence is independent of the evaluator, as long as it is deterministic
    let mut rng = consistent_rng();
    let mut board = random_board_with_moves(&GoBoard::new(4), 5, &mut rng);
    while board.is_done() {
        board = random_board_with_moves(&GoBoard::new(4), 5, &mut rng);
    }
    let evaluator = StonesAndLiberties::default();

    let plain = minimax(&board, &evaluator, 2, &mut rng).unwrap();
    let pruned = alpha_beta(&board, &evaluator, 2, &mut rng).unwrap();

    assert_eq!(plain.value, pruned.value);
    assert!(pruned.leaf_evals <= plain.leaf_evals);
}

#[test]
fn greedy_takes_the_capture() {
    let board = GoBoard::from_fen(CAPTURE_FEN).unwrap();

    let mut agent = GreedyAgent::new(ScoreDiff, consistent_rng());
    assert_eq!(agent.select_move(&board), Ok(Move::Place(Tile::new(5, 4))));
}

#[test]
fn minimax_depth_one_takes_the_capture() {
    let board = GoBoard::from_fen(CAPTURE_FEN).unwrap();

    let mut rng = consistent_rng();
    let result = minimax(&board, &ScoreDiff, 1, &mut rng).unwrap();
    assert_eq!(result.best_move, Some(Move::Place(Tile::new(5, 4))));

    let mut agent = MinimaxAgent::new(1, ScoreDiff, consistent_rng());
    assert_eq!(agent.select_move(&board), Ok(Move::Place(Tile::new(5, 4))));
}

#[test]
fn expectimax_depth_one_takes_the_capture() {
    // with a single ply left there is no chance node, so expectimax reduces to greedy
    let board = GoBoard::from_fen(CAPTURE_FEN).unwrap();

    let mut agent = ExpectimaxAgent::new(1, ScoreDiff, UniformOpponent, consistent_rng());
    assert_eq!(agent.select_move(&board), Ok(Move::Place(Tile::new(5, 4))));
}

#[test]
fn search_on_done_board_fails() {
    let board = GoBoard::from_fen("../.. b 2").unwrap();
    let mut rng = consistent_rng();

    assert!(minimax(&board, &ScoreDiff, 2, &mut rng).is_err());
    assert!(alpha_beta(&board, &ScoreDiff, 2, &mut rng).is_err());
}

#[test]
fn depth_zero_evaluates_in_place() {
    let board = GoBoard::from_fen(".../.b./... w 0").unwrap();
    let mut rng = consistent_rng();

    let result = minimax(&board, &ScoreDiff, 0, &mut rng).unwrap();
    assert_eq!(result.best_move, None);
    assert_eq!(result.value, -9.0, "white is down the whole board");
    assert_eq!(result.leaf_evals, 1);
}
