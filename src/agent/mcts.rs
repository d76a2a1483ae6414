//! Monte Carlo tree search with UCB1 selection and uniform random rollouts.
use std::fmt::{Debug, Formatter};
use std::time::{Duration, Instant};

use decorum::Total;
use internal_iterator::InternalIterator;
use rand::Rng;

use crate::agent::Agent;
use crate::board::{GoBoard, Move};
use crate::error::BoardDone;
use crate::player::{Outcome, Player, POV};

/// The default rollout cutoff: rollouts longer than this are adjudicated by the
/// current area score instead of being played to the bitter end.
pub const DEFAULT_ROLLOUT_CUTOFF: u32 = 50;

/// One node in the search tree, indexed into the flat node arena.
///
/// `total_reward` is accumulated from the POV of the player that played `mv`,
/// so selection at a node can directly maximize its children's means.
#[derive(Debug)]
struct Node {
    mv: Move,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u64,
    total_reward: f32,
}

impl Node {
    fn new(mv: Move, parent: Option<usize>, untried: Vec<Move>) -> Node {
        Node {
            mv,
            parent,
            children: vec![],
            untried,
            visits: 0,
            total_reward: 0.0,
        }
    }

    fn uct(&self, parent_visits: u64, exploration: f32) -> f32 {
        if self.visits == 0 {
            return f32::INFINITY;
        }
        let mean = self.total_reward / self.visits as f32;
        mean + exploration * ((parent_visits as f32).ln() / self.visits as f32).sqrt()
    }
}

/// Iterative MCTS: select by UCB over visit counts and accumulated reward, expand
/// one new child, roll out uniformly at random to a terminal board or the cutoff,
/// and backpropagate the outcome along the visited path. After the budget is spent
/// the most-visited root child is returned.
///
/// Stochastic run to run unless the seed is fixed; always returns a legal move.
/// The optional wall-clock limit is checked only at iteration boundaries, so the
/// tree never contains a half-evaluated child.
pub struct MctsAgent<R: Rng> {
    iterations: u64,
    exploration: f32,
    rollout_cutoff: u32,
    time_limit: Option<Duration>,
    rng: R,
}

impl<R: Rng> Debug for MctsAgent<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MctsAgent {{ iterations: {}, exploration: {}, rollout_cutoff: {} }}",
            self.iterations, self.exploration, self.rollout_cutoff
        )
    }
}

impl<R: Rng> MctsAgent<R> {
    pub fn new(iterations: u64, exploration: f32, rng: R) -> Self {
        assert!(iterations > 0, "requires iterations>0 to find the best move");
        MctsAgent {
            iterations,
            exploration,
            rollout_cutoff: DEFAULT_ROLLOUT_CUTOFF,
            time_limit: None,
            rng,
        }
    }

    pub fn with_rollout_cutoff(mut self, rollout_cutoff: u32) -> Self {
        self.rollout_cutoff = rollout_cutoff;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Play uniformly random moves until the game ends or the cutoff is reached,
    /// then report the (possibly score-adjudicated) outcome.
    fn rollout(&mut self, mut board: GoBoard) -> Outcome {
        for _ in 0..self.rollout_cutoff {
            match board.outcome() {
                Some(outcome) => return outcome,
                None => board.play_random_available_move(&mut self.rng).unwrap(),
            }
        }
        board.outcome().unwrap_or_else(|| board.score().to_outcome())
    }
}

fn untried_moves(board: &GoBoard) -> Vec<Move> {
    match board.available_moves() {
        Ok(moves) => moves.collect(),
        Err(BoardDone) => vec![],
    }
}

/// The player that played the move leading into a node at the given tree depth.
/// Alternates per ply, starting from the root's mover at depth 1.
fn mover_of(root_next: Player, depth: u32) -> Player {
    if depth % 2 == 1 {
        root_next
    } else {
        root_next.other()
    }
}

impl<R: Rng> Agent for MctsAgent<R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        board.check_done()?;

        let root_next = board.next_player();
        let mut nodes: Vec<Node> = vec![Node::new(Move::Pass, None, untried_moves(board))];

        let start = Instant::now();
        for iteration in 0..self.iterations {
            // checked at the iteration boundary only, and never before the first
            // iteration, so there is always at least one root child to return
            if iteration > 0 {
                if let Some(limit) = self.time_limit {
                    if start.elapsed() >= limit {
                        break;
                    }
                }
            }

            // selection: walk down while fully expanded
            let mut curr = 0;
            let mut sim = board.clone();
            let mut depth = 0u32;

            while nodes[curr].untried.is_empty() && !nodes[curr].children.is_empty() {
                let parent_visits = nodes[curr].visits;
                let &best = nodes[curr]
                    .children
                    .iter()
                    .max_by_key(|&&c| Total::from(nodes[c].uct(parent_visits, self.exploration)))
                    .unwrap();
                curr = best;
                depth += 1;
                sim.play(nodes[curr].mv).unwrap();
            }

            // expansion: attach one untried child, if the node is not terminal
            if !nodes[curr].untried.is_empty() {
                let pick = self.rng.gen_range(0..nodes[curr].untried.len());
                let mv = nodes[curr].untried.swap_remove(pick);
                sim.play(mv).unwrap();
                depth += 1;

                let child = Node::new(mv, Some(curr), untried_moves(&sim));
                nodes.push(child);
                let child_index = nodes.len() - 1;
                nodes[curr].children.push(child_index);
                curr = child_index;
            }

            // rollout and backpropagation
            let outcome = self.rollout(sim);

            let mut up = Some(curr);
            let mut up_depth = depth;
            while let Some(index) = up {
                nodes[index].visits += 1;
                nodes[index].total_reward += outcome.pov(mover_of(root_next, up_depth)).sign::<f32>();
                up = nodes[index].parent;
                up_depth = up_depth.saturating_sub(1);
            }
        }

        // the root is never terminal here, so it always has at least one child
        let &best = nodes[0]
            .children
            .iter()
            .max_by_key(|&&c| nodes[c].visits)
            .unwrap();

        Ok(nodes[best].mv)
    }
}
