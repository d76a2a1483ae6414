use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use baduk_ai::agent::qlearn::{QLearnParams, QTable, StateKey};
use baduk_ai::agent::{Agent, QLearnAgent, RandomAgent};
use baduk_ai::arena;
use baduk_ai::board::{GoBoard, Move, Tile};
use baduk_ai::player::Player;

fn rng(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

#[test]
fn state_keys_separate_boards_and_sides() {
    let a = GoBoard::new(3);
    let b = a.clone_and_play(Move::Place(Tile::new(1, 1))).unwrap();
    let c = a.clone_and_play(Move::Pass).unwrap();

    assert_eq!(StateKey::of(&a), StateKey::of(&a));
    assert_ne!(StateKey::of(&a), StateKey::of(&b), "different grids must not collide");
    assert_ne!(StateKey::of(&a), StateKey::of(&c), "different sides must not collide");
}

#[test]
fn td_update_moves_towards_target() {
    let board = GoBoard::new(3);
    let state = StateKey::of(&board);
    let mut table = QTable::new();

    table.td_update(state.clone(), Move::Pass, 0.5, 10.0);
    assert_eq!(table.get(&state, Move::Pass), 5.0);

    table.td_update(state.clone(), Move::Pass, 0.5, 10.0);
    assert_eq!(table.get(&state, Move::Pass), 7.5);

    assert_eq!(table.get(&state, Move::Place(Tile::new(0, 0))), 0.0, "unseen defaults to 0");
    assert_eq!(table.len(), 1);
}

#[test]
fn exploit_prefers_learned_move() {
    let board = GoBoard::new(3);
    let state = StateKey::of(&board);
    let best = Move::Place(Tile::new(1, 1));

    let mut table = QTable::new();
    table.td_update(state, best, 1.0, 5.0);

    let params = QLearnParams {
        epsilon: 0.0,
        ..QLearnParams::default()
    };
    let mut agent = QLearnAgent::new(params, table, rng(0));

    assert_eq!(agent.select_move(&board), Ok(best));
}

#[test]
fn pending_transition_settles_on_next_turn() {
    // alpha 0.5, gamma 0.9, no exploration, empty future: the learned value of the
    // first move must decay from 5.0 to 2.5 once the next decision comes around
    let board = GoBoard::new(3);
    let state = StateKey::of(&board);
    let best = Move::Place(Tile::new(1, 1));

    let mut table = QTable::new();
    table.td_update(state.clone(), best, 1.0, 5.0);

    let params = QLearnParams {
        alpha: 0.5,
        gamma: 0.9,
        epsilon: 0.0,
        ..QLearnParams::default()
    };
    let mut agent = QLearnAgent::new(params, table, rng(0));

    let mv = agent.select_move(&board).unwrap();
    assert_eq!(mv, best);

    // opponent responds, learner is asked again: Q(s,a) += 0.5 * (0 + 0.9*0 - 5.0)
    let board = board.clone_and_play(mv).unwrap();
    let board = board.clone_and_play(Move::Place(Tile::new(0, 0))).unwrap();
    let _ = agent.select_move(&board).unwrap();

    assert_eq!(agent.table().get(&state, best), 2.5);
}

#[test]
fn terminal_reward_is_score_differential() {
    // learner passes, opponent passes, empty board: reward 0; with a lone black
    // stone the reward is the full board for black
    let board = GoBoard::from_fen(".../.b./... b 0").unwrap();
    let state = StateKey::of(&board);

    let params = QLearnParams {
        alpha: 1.0,
        gamma: 0.9,
        epsilon: 0.0,
        ..QLearnParams::default()
    };
    let mut agent = QLearnAgent::new(params, QTable::new(), rng(0));

    // exploiting an empty table: all values 0, the tie-break picks any legal move;
    // force the situation by replaying whatever it picked
    let mv = agent.select_move(&board).unwrap();
    let after = board.clone_and_play(mv).unwrap();
    let done = after.clone_and_play(Move::Pass).unwrap();
    let done = if done.is_done() {
        done
    } else {
        // the learner placed a stone, finish with two passes
        done.clone_and_play(Move::Pass).unwrap()
    };

    let score = done.score();
    let expected = score.for_player(Player::Black) as f32 - score.for_player(Player::White) as f32;

    agent.finish_game(&done);
    assert_eq!(agent.table().get(&state, mv), expected);
}

#[test]
fn epsilon_decays_per_game() {
    let params = QLearnParams {
        epsilon: 1.0,
        epsilon_decay: 0.5,
        min_epsilon: 0.3,
        ..QLearnParams::default()
    };
    let mut agent = QLearnAgent::new(params, QTable::new(), rng(0));

    let done = GoBoard::from_fen("../.. b 2").unwrap();
    agent.finish_game(&done);
    assert_eq!(agent.epsilon(), 0.5);
    agent.finish_game(&done);
    assert_eq!(agent.epsilon(), 0.3, "clamped at min_epsilon");
    agent.finish_game(&done);
    assert_eq!(agent.epsilon(), 0.3);
}

#[test]
fn save_load_roundtrip() {
    let board = GoBoard::new(3);
    let state = StateKey::of(&board);

    let mut table = QTable::new();
    table.td_update(state.clone(), Move::Pass, 1.0, 1.5);
    table.td_update(state.clone(), Move::Place(Tile::new(2, 0)), 1.0, -3.0);

    let mut buffer = Vec::new();
    table.save_json(&mut buffer).unwrap();
    let loaded = QTable::load_json(buffer.as_slice()).unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get(&state, Move::Pass), 1.5);
    assert_eq!(loaded.get(&state, Move::Place(Tile::new(2, 0))), -3.0);
}

/// For a fixed seed and epsilon, training twice against the same fixed opponent
/// produces identical move sequences: the seeded RNGs are the only source of
/// nondeterminism.
#[test]
fn training_is_deterministic() {
    fn play_games(games: u32) -> Vec<Move> {
        let params = QLearnParams {
            epsilon: 0.5,
            ..QLearnParams::default()
        };
        let mut learner = QLearnAgent::new(params, QTable::new(), rng(11));
        let mut opponent = RandomAgent::new(rng(22));

        let mut all_moves = vec![];
        for _ in 0..games {
            let mut board = GoBoard::new(3);
            let mut count = 0;
            while !board.is_done() && count < 60 {
                let mv = if board.next_player() == Player::Black {
                    learner.select_move(&board).unwrap()
                } else {
                    opponent.select_move(&board).unwrap()
                };
                board.play(mv).unwrap();
                all_moves.push(mv);
                count += 1;
            }
            learner.finish_game(&board);
            opponent.finish_game(&board);
        }
        all_moves
    }

    assert_eq!(play_games(3), play_games(3));
}

#[test]
fn train_runs_and_grows_the_table() {
    let mut learner = QLearnAgent::new(QLearnParams::default(), QTable::new(), rng(5));
    let mut opponent = RandomAgent::new(rng(6));

    let result = arena::train(&mut learner, &mut opponent, Player::Black, 3, 10, 60);

    assert_eq!(result.episodes, 10);
    assert_eq!(result.wdl.sum(), 10);
    assert!(!learner.table().is_empty());
    assert!(result.final_epsilon < QLearnParams::default().epsilon);
}
