//! The move-selection agents and their configuration layer.
use std::fmt::Debug;

use crate::board::{GoBoard, Move};
use crate::error::BoardDone;

pub mod expectimax;
pub mod mcts;
pub mod minimax;
pub mod qlearn;
pub mod simple;
pub mod spec;

pub use expectimax::{ExpectimaxAgent, GreedyOpponent, OpponentModel, UniformOpponent};
pub use mcts::MctsAgent;
pub use minimax::{AlphaBetaAgent, MinimaxAgent};
pub use qlearn::{QLearnAgent, QTable, StateKey};
pub use simple::{GreedyAgent, RandomAgent};
pub use spec::AgentSpec;

/// A move-selection strategy.
///
/// `select_move` only fails when the board is already done; on a live board every
/// agent returns a legal move, falling back to [`Move::Pass`] when no placement is
/// available. That fallback is the expected end-of-game signal, never an error.
///
/// `self` is mutable for RNG state and, for learning agents, their table;
/// agents never mutate the board they are given.
pub trait Agent: Debug {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone>;

    /// Called by drivers once per finished game, with the terminal board.
    /// Learning agents use this to apply their terminal update and advance their
    /// exploration schedule; everything else ignores it.
    fn finish_game(&mut self, _final_board: &GoBoard) {}
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        (**self).select_move(board)
    }

    fn finish_game(&mut self, final_board: &GoBoard) {
        (**self).finish_game(final_board)
    }
}
