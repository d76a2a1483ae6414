#![warn(missing_debug_implementations)]
#![allow(clippy::new_without_default)]

//! A [GoBoard](crate::board::GoBoard) rules engine for Go/Baduk and a family of
//! [Agent](crate::agent::Agent)s that play it.
//!
//! # Features
//!
//! The rules engine implements the one fixed ruleset of this crate: suicide
//! illegal, simple ko, game end after two consecutive passes, area scoring
//! without komi. Groups and liberties are recomputed on demand by flood fill,
//! positions are hashed incrementally with Zobrist keys, and boards are cheap
//! snapshot values so search never corrupts the authoritative game state.
//!
//! The agents, all behind the [Agent](crate::agent::Agent) trait:
//! * [RandomAgent](crate::agent::RandomAgent), uniform over the available moves.
//! * [GreedyAgent](crate::agent::GreedyAgent), one-ply argmax of an
//!   [Evaluator](crate::eval::Evaluator).
//! * [MinimaxAgent](crate::agent::MinimaxAgent) and
//!   [AlphaBetaAgent](crate::agent::AlphaBetaAgent), fixed-depth full-width
//!   search, the latter with alpha-beta pruning.
//! * [ExpectimaxAgent](crate::agent::ExpectimaxAgent), expectation over a
//!   declared opponent model instead of an adversarial minimum.
//! * [MctsAgent](crate::agent::MctsAgent), Monte Carlo tree search with UCB1
//!   selection and random rollouts.
//! * [QLearnAgent](crate::agent::QLearnAgent), tabular Q-learning over exact
//!   board fingerprints, with a table that persists across games.
//!
//! Agents are built from configuration strings like `"alpha_beta:3"` through
//! [AgentSpec](crate::agent::AgentSpec), and [arena](crate::arena) runs series
//! of games between two of them.
//!
//! # Examples
//!
//! ## List the available moves on a board and play a random one.
//!
//! ```
//! # use baduk_ai::board::GoBoard;
//! # use internal_iterator::InternalIterator;
//! # let mut rng = rand::thread_rng();
//! let mut board = GoBoard::new(9);
//! println!("{}", board);
//!
//! board.available_moves().unwrap().for_each(|mv| {
//!     println!("{}", mv)
//! });
//!
//! let mv = board.random_available_move(&mut rng).unwrap();
//! println!("Picked move {}", mv);
//! board.play(mv).unwrap();
//! println!("{}", board);
//! ```
//!
//! ## Get the best move according to MCTS
//!
//! ```
//! # use baduk_ai::agent::{Agent, MctsAgent};
//! # use baduk_ai::board::GoBoard;
//! # use rand::rngs::SmallRng;
//! # use rand::SeedableRng;
//! let board = GoBoard::new(5);
//!
//! let mut agent = MctsAgent::new(100, 1.5, SmallRng::seed_from_u64(0));
//! println!("{}", agent.select_move(&board).unwrap());
//! ```

pub mod player;

pub mod board;

pub mod error;
pub mod eval;

pub mod agent;

pub mod arena;

pub mod util;
