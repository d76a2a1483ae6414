//! Run agents against each other and report the results.
//!
//! This is the thin glue around the core: construct a board, ask each agent for a
//! move in turn, apply it, stop at termination, score. A move rejected by the rules
//! engine here is an agent bug, not a normal game event, and panics with context.
use std::fmt::Write as _;
use std::fmt::{Debug, Formatter};
use std::sync::Mutex;
use std::time::Instant;

use itertools::Itertools;
use rand::Rng;
use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator;
use tracing::{debug, info};

use crate::agent::{Agent, QLearnAgent};
use crate::board::{GoBoard, Move};
use crate::player::{Outcome, Player, POV, WDL};
use crate::util::elo_from_wdl;

/// Cap on the number of moves per game before the result is adjudicated by the
/// current area score. Simple ko does not rule out longer repetition cycles, so an
/// uncapped random-vs-random game is not guaranteed to ever finish.
pub const DEFAULT_MAX_MOVES: u32 = 1000;

/// Run `agent_l` against `agent_r` on the board given by `start`.
///
/// `games_per_side` games are run, except if `both_sides` is true, in which case a
/// match consists of two games per start position where players switch sides.
/// Games run in parallel; the factories are called once per game so no agent state
/// leaks between games (which is also why this runner cannot train a Q-table —
/// use [`train`] for that).
///
/// `callback` is called after every finished game with the running tally.
#[must_use]
pub fn run<L: Agent, R: Agent>(
    start: impl Fn() -> GoBoard + Sync,
    agent_l: impl Fn() -> L + Sync,
    agent_r: impl Fn() -> R + Sync,
    games_per_side: u32,
    both_sides: bool,
    max_moves: u32,
    callback: impl Fn(WDL<u32>, &GameRecord) + Sync,
) -> SeriesResult {
    let callback = &callback;

    // this instantiates both at least once so we catch errors before starting a bunch of threads
    let debug_l = debug_to_string(&agent_l());
    let debug_r = debug_to_string(&agent_r());

    let game_count = if both_sides { 2 * games_per_side } else { games_per_side };
    let starts = (0..games_per_side).map(|_| start()).collect_vec();

    let partial_wdl = Mutex::new(WDL::<u32>::default());

    let records: Vec<GameRecord> = (0..game_count)
        .into_par_iter()
        .panic_fuse()
        .map(|game_i| {
            let flip = if both_sides { game_i % 2 == 1 } else { false };
            let pair_i = if both_sides { game_i / 2 } else { game_i };
            let start = &starts[pair_i as usize];

            let record = play_single_game(start, flip, &mut agent_l(), &mut agent_r(), max_moves);

            let mut partial_wdl = partial_wdl.lock().unwrap();
            *partial_wdl += record.outcome.pov(record.player_l).to_wdl();
            debug!(
                game = game_i,
                moves = record.moves.len(),
                outcome = ?record.outcome,
                "finished game"
            );
            callback(*partial_wdl, &record);

            record
        })
        .collect();

    let total_time_l = records.iter().map(|r| r.total_time_l).sum::<f32>();
    let total_time_r = records.iter().map(|r| r.total_time_r).sum::<f32>();
    let move_count_l = records.iter().map(|r| r.move_count_l).sum::<u32>();
    let move_count_r = records.iter().map(|r| r.move_count_r).sum::<u32>();

    SeriesResult {
        game_count,
        average_game_length: records.iter().map(|r| r.moves.len() as f32).sum::<f32>() / game_count as f32,
        wdl_l: records.iter().map(|r| r.outcome.pov(r.player_l).to_wdl()).sum(),
        time_l: total_time_l / move_count_l as f32,
        time_r: total_time_r / move_count_r as f32,
        debug_l,
        debug_r,
        records,
    }
}

fn play_single_game(
    start: &GoBoard,
    flip: bool,
    agent_l: &mut impl Agent,
    agent_r: &mut impl Agent,
    max_moves: u32,
) -> GameRecord {
    let mut board = start.clone();
    let player_l = if flip {
        board.next_player().other()
    } else {
        board.next_player()
    };

    let mut total_time_l = 0.0;
    let mut total_time_r = 0.0;
    let mut move_count_l: u32 = 0;
    let mut move_count_r: u32 = 0;
    let mut moves = vec![];

    let outcome = loop {
        match board.outcome() {
            Some(outcome) => break outcome,
            None => {
                if moves.len() as u32 >= max_moves {
                    break board.score().to_outcome();
                }

                let start_time = Instant::now();
                let mv = if board.next_player() == player_l {
                    let mv = select_checked(agent_l, &board);
                    total_time_l += start_time.elapsed().as_secs_f32();
                    move_count_l += 1;
                    mv
                } else {
                    let mv = select_checked(agent_r, &board);
                    total_time_r += start_time.elapsed().as_secs_f32();
                    move_count_r += 1;
                    mv
                };

                moves.push(mv);
                board
                    .play(mv)
                    .unwrap_or_else(|e| panic!("Agent returned unavailable move {}: {:?}", mv, e));
            }
        }
    };

    agent_l.finish_game(&board);
    agent_r.finish_game(&board);

    GameRecord {
        start: start.clone(),
        player_l,
        moves,
        outcome,
        total_time_l,
        total_time_r,
        move_count_l,
        move_count_r,
        debug_l: debug_to_string(agent_l),
        debug_r: debug_to_string(agent_r),
    }
}

fn select_checked(agent: &mut impl Agent, board: &GoBoard) -> Move {
    agent
        .select_move(board)
        .expect("select_move called on a live board")
}

/// A single finished game: the start position, who played left, the move sequence
/// and the outcome (score-adjudicated if the move cap was hit).
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub start: GoBoard,
    pub player_l: Player,

    pub moves: Vec<Move>,
    pub outcome: Outcome,

    pub total_time_l: f32,
    pub total_time_r: f32,
    pub move_count_l: u32,
    pub move_count_r: u32,

    pub debug_l: String,
    pub debug_r: String,
}

/// Structure returned by the function [`run`].
pub struct SeriesResult {
    pub game_count: u32,
    pub records: Vec<GameRecord>,

    pub average_game_length: f32,
    pub wdl_l: WDL<u32>,

    // time per move in seconds
    pub time_l: f32,
    pub time_r: f32,

    pub debug_l: String,
    pub debug_r: String,
}

impl Debug for SeriesResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SeriesResult {{")?;
        writeln!(
            f,
            "  {} games, average length {}",
            self.game_count, self.average_game_length
        )?;
        writeln!(f, "  left      {:?}", self.wdl_l)?;
        writeln!(
            f,
            "  left      {:.3?}",
            self.wdl_l.cast::<f32>() / self.game_count as f32
        )?;
        writeln!(f, "  left elo: {:.1}", elo_from_wdl(self.wdl_l.cast::<f32>()))?;
        writeln!(f, "  time_l:   {:.4}, time_r: {:.4}", self.time_l, self.time_r)?;
        writeln!(f, "  left:     {}", self.debug_l)?;
        writeln!(f, "  right:    {}", self.debug_r)?;
        writeln!(f, "}}")?;

        Ok(())
    }
}

/// Result of a [`train`] run.
#[derive(Debug)]
pub struct TrainResult {
    pub episodes: u32,
    /// Outcomes from the learner's POV.
    pub wdl: WDL<u32>,
    pub final_epsilon: f32,
}

/// Train `learner` against `opponent` over `episodes` games on a fresh board of
/// the given size, with the learner playing `learner_player`.
///
/// Strictly sequential: the Q-table has exactly one writer, and every episode sees
/// the updates of the previous ones. The learner's epsilon decays once per episode
/// through its [`Agent::finish_game`] hook.
pub fn train<R: Rng>(
    learner: &mut QLearnAgent<R>,
    opponent: &mut impl Agent,
    learner_player: Player,
    size: u8,
    episodes: u32,
    max_moves: u32,
) -> TrainResult {
    let mut wdl = WDL::<u32>::default();

    for episode in 0..episodes {
        let mut board = GoBoard::new(size);
        let mut move_count = 0u32;

        let outcome = loop {
            match board.outcome() {
                Some(outcome) => break outcome,
                None if move_count >= max_moves => break board.score().to_outcome(),
                None => {
                    let mv = if board.next_player() == learner_player {
                        select_checked(learner, &board)
                    } else {
                        select_checked(opponent, &board)
                    };
                    board
                        .play(mv)
                        .unwrap_or_else(|e| panic!("Agent returned unavailable move {}: {:?}", mv, e));
                    move_count += 1;
                }
            }
        };

        learner.finish_game(&board);
        opponent.finish_game(&board);

        wdl += outcome.pov(learner_player).to_wdl();

        if (episode + 1) % 100 == 0 {
            info!(
                episode = episode + 1,
                entries = learner.table().len(),
                epsilon = learner.epsilon() as f64,
                "training progress"
            );
        }
    }

    info!(episodes, wdl = ?wdl, entries = learner.table().len(), "training finished");

    TrainResult {
        episodes,
        wdl,
        final_epsilon: learner.epsilon(),
    }
}

fn debug_to_string(d: &impl Debug) -> String {
    let mut s = String::new();
    write!(&mut s, "{:?}", d).unwrap();
    s
}
