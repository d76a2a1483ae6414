//! Tabular Q-learning over exact board fingerprints.
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::io;

use internal_iterator::InternalIterator;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::board::{GoBoard, Move, Tile};
use crate::error::BoardDone;
use crate::player::Player;

/// A canonical, collision-free fingerprint of a board: the full grid packed at two
/// bits per point, plus the side to move and the board size.
///
/// Two distinct boards never map to the same key and identical boards always map to
/// identical keys, which is why this is the Q-table key instead of the (much smaller,
/// but collision-prone) Zobrist hash.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    size: u8,
    next_player: Player,
    packed: Vec<u8>,
}

impl StateKey {
    pub fn of(board: &GoBoard) -> StateKey {
        let size = board.size();
        let area = size as usize * size as usize;
        let mut packed = vec![0u8; (area + 3) / 4];

        for (i, tile) in Tile::all(size).enumerate() {
            let code = match board.stone_at(tile) {
                None => 0u8,
                Some(Player::Black) => 1,
                Some(Player::White) => 2,
            };
            packed[i / 4] |= code << ((i % 4) * 2);
        }

        StateKey {
            size,
            next_player: board.next_player(),
            packed,
        }
    }
}

/// The action-value table: process-lifetime mutable state that persists and improves
/// across games within a run.
///
/// The table is an explicitly owned value injected into [`QLearnAgent`], never a
/// global, so concurrent training runs can be isolated in tests. It can be saved at
/// program end and reloaded later through [`QTable::save_json`]/[`QTable::load_json`].
#[derive(Debug, Clone, Default)]
pub struct QTable {
    map: HashMap<(StateKey, Move), f32>,
}

#[derive(Serialize, Deserialize)]
struct QEntry {
    state: StateKey,
    action: Move,
    q: f32,
}

impl QTable {
    pub fn new() -> QTable {
        QTable::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The learned value of `(state, action)`, 0.0 if never updated.
    pub fn get(&self, state: &StateKey, action: Move) -> f32 {
        // TODO avoid the key clone once HashMap::get supports borrowed tuple keys
        self.map.get(&(state.clone(), action)).copied().unwrap_or(0.0)
    }

    /// `max_a' Q(state, a')` over the given actions, 0.0 when there are none.
    pub fn max_value(&self, state: &StateKey, actions: impl Iterator<Item = Move>) -> f32 {
        actions
            .map(|action| self.get(state, action))
            .fold(None, |best: Option<f32>, q| Some(best.map_or(q, |b| b.max(q))))
            .unwrap_or(0.0)
    }

    /// The standard temporal-difference update:
    /// `Q(s,a) <- Q(s,a) + alpha * (target - Q(s,a))`.
    pub fn td_update(&mut self, state: StateKey, action: Move, alpha: f32, target: f32) {
        let q = self.map.entry((state, action)).or_insert(0.0);
        *q += alpha * (target - *q);
    }

    pub fn save_json<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        let entries: Vec<QEntry> = self
            .map
            .iter()
            .map(|(&(ref state, action), &q)| QEntry {
                state: state.clone(),
                action,
                q,
            })
            .collect();
        serde_json::to_writer(writer, &entries)
    }

    pub fn load_json<R: io::Read>(reader: R) -> serde_json::Result<QTable> {
        let entries: Vec<QEntry> = serde_json::from_reader(reader)?;
        let map = entries
            .into_iter()
            .map(|entry| ((entry.state, entry.action), entry.q))
            .collect();
        Ok(QTable { map })
    }
}

/// Learning and exploration hyperparameters.
#[derive(Debug, Copy, Clone)]
pub struct QLearnParams {
    /// Learning rate.
    pub alpha: f32,
    /// Discount factor for future rewards.
    pub gamma: f32,
    /// Initial probability of exploring with a random move.
    pub epsilon: f32,
    /// Multiplicative epsilon decay applied after every finished game.
    pub epsilon_decay: f32,
    pub min_epsilon: f32,
}

impl Default for QLearnParams {
    fn default() -> Self {
        QLearnParams {
            alpha: 0.3,
            gamma: 0.9,
            epsilon: 1.0,
            epsilon_decay: 0.99,
            min_epsilon: 0.1,
        }
    }
}

/// Epsilon-greedy tabular Q-learning agent.
///
/// The TD update for a move is applied when the *next* decision for the same side
/// comes around (reward 0, bootstrapped from the new state), and the terminal
/// update (reward = final score differential) is applied in
/// [`Agent::finish_game`] — drivers must call it for learning to work.
pub struct QLearnAgent<R: Rng> {
    params: QLearnParams,
    epsilon: f32,
    table: QTable,
    pending: Option<(StateKey, Move, Player)>,
    rng: R,
}

impl<R: Rng> Debug for QLearnAgent<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "QLearnAgent {{ alpha: {}, gamma: {}, epsilon: {}, entries: {} }}",
            self.params.alpha,
            self.params.gamma,
            self.epsilon,
            self.table.len()
        )
    }
}

impl<R: Rng> QLearnAgent<R> {
    pub fn new(params: QLearnParams, table: QTable, rng: R) -> Self {
        QLearnAgent {
            epsilon: params.epsilon,
            params,
            table,
            pending: None,
            rng,
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Argmax of the learned values over the available moves,
    /// ties broken uniformly at random.
    fn exploit(&mut self, board: &GoBoard, state: &StateKey) -> Result<Move, BoardDone> {
        let mut best_q = f32::NEG_INFINITY;
        let mut best_move = Move::Pass;
        let mut tie_count = 0;

        board.available_moves()?.for_each(|mv| {
            let q = self.table.get(state, mv);
            if q > best_q {
                best_q = q;
                best_move = mv;
                tie_count = 1;
            } else if q == best_q {
                tie_count += 1;
                if self.rng.gen_range(0..tie_count) == 0 {
                    best_move = mv;
                }
            }
        });

        Ok(best_move)
    }
}

impl<R: Rng> Agent for QLearnAgent<R> {
    fn select_move(&mut self, board: &GoBoard) -> Result<Move, BoardDone> {
        board.check_done()?;
        let state = StateKey::of(board);

        // settle the previous transition: zero reward, bootstrap from this state
        if let Some((prev_state, prev_action, _)) = self.pending.take() {
            let moves: Vec<Move> = board.available_moves()?.collect();
            let future = self.table.max_value(&state, moves.into_iter());
            let target = self.params.gamma * future;
            self.table.td_update(prev_state, prev_action, self.params.alpha, target);
        }

        let mv = if self.rng.gen::<f32>() < self.epsilon {
            board.random_available_move(&mut self.rng)?
        } else {
            self.exploit(board, &state)?
        };

        self.pending = Some((state, mv, board.next_player()));
        Ok(mv)
    }

    fn finish_game(&mut self, final_board: &GoBoard) {
        if let Some((state, action, pov)) = self.pending.take() {
            let score = final_board.score();
            let reward = score.for_player(pov) as f32 - score.for_player(pov.other()) as f32;
            self.table.td_update(state, action, self.params.alpha, reward);
        }

        self.epsilon = (self.epsilon * self.params.epsilon_decay).max(self.params.min_epsilon);
    }
}
