use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use baduk_ai::agent::{Agent, AgentSpec, MctsAgent};
use baduk_ai::arena;
use baduk_ai::board::{GoBoard, Move};
use baduk_ai::error::ConfigError;
use baduk_ai::player::Player;

const CHEAP_SPECS: &[&str] = &[
    "random",
    "greedy",
    "minimax:2",
    "alpha_beta:2",
    "expectimax:2",
    "monte_carlo:20",
    "qlearn",
];

/// Every agent must only ever return moves the rules engine accepts, for a whole
/// game against a random opponent.
#[test]
fn agents_play_full_legal_games() {
    for (i, spec) in CHEAP_SPECS.iter().enumerate() {
        let spec: AgentSpec = spec.parse().unwrap();
        let mut agent = spec.build(42 + i as u64);
        let mut opponent = AgentSpec::Random.build(7);

        let mut board = GoBoard::new(5);
        let mut moves = 0;

        while !board.is_done() && moves < 120 {
            let mv = if board.next_player() == Player::Black {
                agent.select_move(&board).unwrap()
            } else {
                opponent.select_move(&board).unwrap()
            };

            assert_eq!(
                board.is_available_move(mv),
                Ok(true),
                "{:?} returned unavailable move {} on {:?}",
                agent,
                mv,
                board
            );
            board.play(mv).unwrap();
            moves += 1;
        }
    }
}

/// When pass is the only available move, every agent must return it rather than fail.
#[test]
fn agents_pass_when_forced() {
    // the only placement on a 1x1 board is suicide
    let board = GoBoard::new(1);

    for (i, spec) in CHEAP_SPECS.iter().enumerate() {
        let spec: AgentSpec = spec.parse().unwrap();
        let mut agent = spec.build(i as u64);
        assert_eq!(agent.select_move(&board), Ok(Move::Pass), "{:?} did not pass", agent);
    }
}

#[test]
fn agents_fail_on_done_board() {
    let board = GoBoard::from_fen("../.. b 2").unwrap();

    for spec in CHEAP_SPECS {
        let spec: AgentSpec = spec.parse().unwrap();
        let mut agent = spec.build(0);
        assert!(agent.select_move(&board).is_err(), "{:?} accepted a done board", agent);
    }
}

#[test]
fn mcts_is_deterministic_given_seed() {
    let board = GoBoard::from_fen("b.w../...b./w..../.bw../..b.. b 0").unwrap();

    let mv_a = MctsAgent::new(100, 1.5, Xoshiro256PlusPlus::seed_from_u64(3))
        .select_move(&board)
        .unwrap();
    let mv_b = MctsAgent::new(100, 1.5, Xoshiro256PlusPlus::seed_from_u64(3))
        .select_move(&board)
        .unwrap();

    assert_eq!(mv_a, mv_b);
}

#[test]
fn unknown_agent_fails_fast() {
    assert_eq!(
        "sarsa".parse::<AgentSpec>(),
        Err(ConfigError::UnknownAgent("sarsa".to_owned()))
    );
}

#[test]
fn arena_runs_a_series() {
    let result = arena::run(
        || GoBoard::new(5),
        || AgentSpec::Random.build(1),
        || AgentSpec::Greedy.build(2),
        4,
        true,
        200,
        |_, record| {
            assert!(!record.moves.is_empty());
        },
    );

    assert_eq!(result.game_count, 8);
    assert_eq!(result.wdl_l.sum(), 8);
    assert_eq!(result.records.len(), 8);
    assert!(result.average_game_length > 0.0);
}
