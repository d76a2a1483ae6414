//! Fixed-depth full-width search: plain minimax and alpha-beta pruned minimax.
//!
//! Both run the same negamax recursion; the only difference is whether the
//! alpha/beta window is narrowed and cut on. For the same depth and evaluator the
//! two return the same value, and the pruned variant never evaluates more leaves.
use std::fmt::{Debug, Formatter};
use std::ops::ControlFlow;

use internal_iterator::InternalIterator;
use rand::Rng;

use crate::agent::Agent;
use crate::board::{GoBoard, Move};
use crate::error::BoardDone;
use crate::eval::Evaluator;

#[derive(Debug)]
pub struct SearchResult {
    /// The value of the board from the POV of its next player.
    pub value: f32,
    /// The best move, `None` if the board is done or the depth was 0.
    pub best_move: Option<Move>,
    /// Number of evaluator calls made, for diagnostics and pruning tests.
    pub leaf_evals: u64,
}

/// Full-width minimax to `depth` plies. Ties at the root are broken uniformly using `rng`.
pub fn minimax<E: Evaluator>(
    board: &GoBoard,
    evaluator: &E,
    depth: u32,
    rng: &mut impl Rng,
) -> Result<SearchResult, BoardDone> {
    search(board, evaluator, depth, false, rng)
}

/// Minimax with alpha-beta pruning. Same value as [`minimax`] at the same depth,
/// strictly fewer or equally many leaf evaluations. Move ordering is the board's
/// deterministic move order; ordering only affects speed, never the value.
pub fn alpha_beta<E: Evaluator>(
    board: &GoBoard,
    evaluator: &E,
    depth: u32,
    rng: &mut impl Rng,
) -> Result<SearchResult, BoardDone> {
    search(board, evaluator, depth, true, rng)
}

fn search<E: Evaluator>(
    board: &GoBoard,
    evaluator: &E,
    depth: u32,
    prune: bool,
    rng: &mut impl Rng,
) -> Result<SearchResult, BoardDone> {
    board.check_done()?;

    let mut leaf_evals = 0;
    let (value, best_move) = negamax_recurse(
        evaluator,
        board,
        depth,
        f32::NEG_INFINITY,
        f32::INFINITY,
        prune,
        &mut leaf_evals,
        &mut RandomTieBreak { rng, count: 0 },
    );

    Ok(SearchResult {
        value,
        best_move,
        leaf_evals,
    })
}

/// Root-only move selection, a trait so the recursion is instantiated once with
/// tie-breaking and once without any move bookkeeping for the deeper nodes.
trait MoveSelector {
    /// Report a move whose value is at least as good as the best so far.
    /// Returns whether it should become the selected move.
    fn consider(&mut self, strictly_better: bool) -> bool;
}

struct NoMoveSelector;

impl MoveSelector for NoMoveSelector {
    fn consider(&mut self, _: bool) -> bool {
        false
    }
}

/// Uniform choice among the equal-valued best moves,
/// implemented with reservoir sampling.
struct RandomTieBreak<'a, R: Rng> {
    rng: &'a mut R,
    count: u32,
}

impl<R: Rng> MoveSelector for RandomTieBreak<'_, R> {
    fn consider(&mut self, strictly_better: bool) -> bool {
        if strictly_better {
            self.count = 1;
            true
        } else {
            self.count += 1;
            self.rng.gen_range(0..self.count) == 0
        }
    }
}

/// Fail-soft negamax, optionally with alpha-beta pruning.
/// <https://en.wikipedia.org/wiki/Negamax#Negamax_with_alpha_beta_pruning>
#[allow(clippy::too_many_arguments)]
fn negamax_recurse<E: Evaluator>(
    evaluator: &E,
    board: &GoBoard,
    depth_left: u32,
    alpha: f32,
    beta: f32,
    prune: bool,
    leaf_evals: &mut u64,
    selector: &mut impl MoveSelector,
) -> (f32, Option<Move>) {
    if depth_left == 0 || board.is_done() {
        *leaf_evals += 1;
        return (evaluator.evaluate(board, board.next_player()), None);
    }

    let mut best_value: Option<f32> = None;
    let mut best_move: Option<Move> = None;
    let mut alpha = alpha;

    let early = board.available_moves().unwrap().try_for_each(|mv| {
        // the move comes from available_moves, so play cannot fail
        let child = board.clone_and_play(mv).unwrap();

        let (child_value, _) = negamax_recurse(
            evaluator,
            &child,
            depth_left - 1,
            -beta,
            -alpha,
            prune,
            leaf_evals,
            &mut NoMoveSelector,
        );
        let child_value = -child_value;

        let is_gte = best_value.map_or(true, |best| child_value >= best);
        let strictly_better = best_value.map_or(true, |best| child_value > best);

        if is_gte {
            best_value = Some(child_value);
            if selector.consider(strictly_better) {
                best_move = Some(mv);
            }
        }

        if prune {
            alpha = alpha.max(child_value);
            if alpha >= beta {
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    });

    let _ = early;
    // best_value is always set: a live board has at least the pass move
    (best_value.unwrap(), best_move)
}

pub struct MinimaxAgent<E: Evaluator, R: Rng> {
    depth: u32,
    evaluator: E,
    rng: R,
}

impl<E: Evaluator, R: Rng> Debug for MinimaxAgent<E, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MinimaxAgent {{ depth: {}, evaluator: {:?} }}", self.depth, self.evaluator)
    }
}

impl<E: Evaluator, R: Rng> MinimaxAgent<E, R> {
    pub fn new(depth: u32, evaluator: E, rng: R) -> Self {
        assert!(depth > 0, "requires depth>0 to find the best move");
        MinimaxAgent { depth, evaluator, rng }
    }
}

impl<E: Evaluator, R: Rng> Agent for MinimaxAgent<E, R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        let result = minimax(board, &self.evaluator, self.depth, &mut self.rng)?;
        // depth > 0 and the board is not done, so a best move always exists;
        // pass is the defensive fallback either way
        Ok(result.best_move.unwrap_or(Move::Pass))
    }
}

pub struct AlphaBetaAgent<E: Evaluator, R: Rng> {
    depth: u32,
    evaluator: E,
    rng: R,
}

impl<E: Evaluator, R: Rng> Debug for AlphaBetaAgent<E, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AlphaBetaAgent {{ depth: {}, evaluator: {:?} }}",
            self.depth, self.evaluator
        )
    }
}

impl<E: Evaluator, R: Rng> AlphaBetaAgent<E, R> {
    pub fn new(depth: u32, evaluator: E, rng: R) -> Self {
        assert!(depth > 0, "requires depth>0 to find the best move");
        AlphaBetaAgent { depth, evaluator, rng }
    }
}

impl<E: Evaluator, R: Rng> Agent for AlphaBetaAgent<E, R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        let result = alpha_beta(board, &self.evaluator, self.depth, &mut self.rng)?;
        Ok(result.best_move.unwrap_or(Move::Pass))
    }
}
