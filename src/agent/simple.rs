//! Two one-ply agents: `RandomAgent` and `GreedyAgent`.
use std::fmt::{Debug, Formatter};

use decorum::Total;
use internal_iterator::InternalIterator;
use rand::Rng;

use crate::agent::Agent;
use crate::board::{GoBoard, Move};
use crate::error::BoardDone;
use crate::eval::Evaluator;

/// Chooses uniformly among the available moves. Deterministic given its seed,
/// which makes it the baseline opponent for reproducibility tests.
pub struct RandomAgent<R: Rng> {
    rng: R,
}

impl<R: Rng> Debug for RandomAgent<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RandomAgent")
    }
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(rng: R) -> Self {
        RandomAgent { rng }
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        board.random_available_move(&mut self.rng)
    }
}

/// Evaluates every child board one ply deep and picks the maximum,
/// breaking ties uniformly at random.
pub struct GreedyAgent<E: Evaluator, R: Rng> {
    evaluator: E,
    rng: R,
}

impl<E: Evaluator, R: Rng> Debug for GreedyAgent<E, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GreedyAgent {{ evaluator: {:?} }}", self.evaluator)
    }
}

impl<E: Evaluator, R: Rng> GreedyAgent<E, R> {
    pub fn new(evaluator: E, rng: R) -> Self {
        GreedyAgent { evaluator, rng }
    }
}

impl<E: Evaluator, R: Rng> Agent for GreedyAgent<E, R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        let me = board.next_player();

        let mut best_value: Option<Total<f32>> = None;
        let mut best_move = Move::Pass;
        let mut tie_count = 0;

        board.available_moves()?.for_each(|mv| {
            // the move comes from available_moves, so play cannot fail
            let child = board.clone_and_play(mv).unwrap();
            let value = Total::from(self.evaluator.evaluate(&child, me));

            let better = match best_value {
                None => true,
                Some(best) => value > best,
            };

            if better {
                best_value = Some(value);
                best_move = mv;
                tie_count = 1;
            } else if best_value == Some(value) {
                // reservoir sampling over equal-valued moves
                tie_count += 1;
                if self.rng.gen_range(0..tie_count) == 0 {
                    best_move = mv;
                }
            }
        });

        Ok(best_move)
    }
}
