//! Depth-bounded expectimax against a declared opponent model.
//!
//! Unlike minimax, the opponent ply is a chance node: the value is the expectation
//! over the move distribution the opponent is *known* to play, not an adversarial
//! minimum. Only worth using when the opponent really is non-adversarial, e.g. the
//! uniform random agent.
use std::fmt::{Debug, Formatter};

use decorum::Total;
use internal_iterator::InternalIterator;
use rand::Rng;

use crate::agent::Agent;
use crate::board::{GoBoard, Move};
use crate::error::BoardDone;
use crate::eval::Evaluator;
use crate::player::Player;

/// The move distribution a known opponent plays. Weights are positive and sum to 1.
pub trait OpponentModel: Debug {
    fn distribution(&self, board: &GoBoard) -> Result<Vec<(Move, f32)>, BoardDone>;
}

/// Models an opponent that picks uniformly among its available moves,
/// i.e. [`RandomAgent`](crate::agent::RandomAgent).
#[derive(Debug, Copy, Clone, Default)]
pub struct UniformOpponent;

impl OpponentModel for UniformOpponent {
    fn distribution(&self, board: &GoBoard) -> Result<Vec<(Move, f32)>, BoardDone> {
        let moves: Vec<Move> = board.available_moves()?.collect();
        let p = 1.0 / moves.len() as f32;
        Ok(moves.into_iter().map(|mv| (mv, p)).collect())
    }
}

/// Models a deterministic one-ply greedy opponent as a point mass on its argmax
/// move, ties resolved by move order.
#[derive(Debug, Copy, Clone, Default)]
pub struct GreedyOpponent<E: Evaluator> {
    evaluator: E,
}

impl<E: Evaluator> GreedyOpponent<E> {
    pub fn new(evaluator: E) -> Self {
        GreedyOpponent { evaluator }
    }
}

impl<E: Evaluator> OpponentModel for GreedyOpponent<E> {
    fn distribution(&self, board: &GoBoard) -> Result<Vec<(Move, f32)>, BoardDone> {
        let me = board.next_player();

        let best = board
            .available_moves()?
            .map(|mv| {
                let child = board.clone_and_play(mv).unwrap();
                (mv, Total::from(self.evaluator.evaluate(&child, me)))
            })
            .max_by_key(|&(_, value)| value)
            .map(|(mv, _)| mv)
            .unwrap();

        Ok(vec![(best, 1.0)])
    }
}

pub struct ExpectimaxAgent<E: Evaluator, M: OpponentModel, R: Rng> {
    depth: u32,
    evaluator: E,
    opponent: M,
    rng: R,
}

impl<E: Evaluator, M: OpponentModel, R: Rng> Debug for ExpectimaxAgent<E, M, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExpectimaxAgent {{ depth: {}, evaluator: {:?}, opponent: {:?} }}",
            self.depth, self.evaluator, self.opponent
        )
    }
}

impl<E: Evaluator, M: OpponentModel, R: Rng> ExpectimaxAgent<E, M, R> {
    pub fn new(depth: u32, evaluator: E, opponent: M, rng: R) -> Self {
        assert!(depth > 0, "requires depth>0 to find the best move");
        ExpectimaxAgent {
            depth,
            evaluator,
            opponent,
            rng,
        }
    }

    /// Value of `board` from the POV of `me`, maximizing on own plies and taking
    /// the model expectation on opponent plies.
    fn value(&self, board: &GoBoard, me: Player, depth_left: u32) -> f32 {
        if depth_left == 0 || board.is_done() {
            return self.evaluator.evaluate(board, me);
        }

        if board.next_player() == me {
            let best = board
                .available_moves()
                .unwrap()
                .map(|mv| {
                    let child = board.clone_and_play(mv).unwrap();
                    Total::from(self.value(&child, me, depth_left - 1))
                })
                .max_by_key(|&value| value)
                .unwrap();
            best.into_inner()
        } else {
            self.opponent
                .distribution(board)
                .unwrap()
                .into_iter()
                .map(|(mv, p)| {
                    let child = board.clone_and_play(mv).unwrap();
                    p * self.value(&child, me, depth_left - 1)
                })
                .sum()
        }
    }
}

impl<E: Evaluator, M: OpponentModel, R: Rng> Agent for ExpectimaxAgent<E, M, R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        let me = board.next_player();

        let mut best_value: Option<Total<f32>> = None;
        let mut best_move = Move::Pass;
        let mut tie_count = 0;

        board.available_moves()?.for_each(|mv| {
            let child = board.clone_and_play(mv).unwrap();
            let value = Total::from(self.value(&child, me, self.depth - 1));

            let better = best_value.map_or(true, |best| value > best);
            if better {
                best_value = Some(value);
                best_move = mv;
                tie_count = 1;
            } else if best_value == Some(value) {
                tie_count += 1;
                if self.rng.gen_range(0..tie_count) == 0 {
                    best_move = mv;
                }
            }
        });

        Ok(best_move)
    }
}
