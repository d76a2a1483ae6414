//! The Go board and rules engine: move legality, capture, suicide and ko
//! enforcement, terminal detection and area scoring.
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::ControlFlow;

use internal_iterator::InternalIterator;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BoardDone, PlayError};
use crate::player::{Outcome, Player};

pub use group::Group;
pub use score::{Score, Territory};
pub use tile::{Direction, Tile};
pub use zobrist::Zobrist;

mod group;
mod io;
mod score;
mod tile;
mod zobrist;

pub use io::{InvalidFen, InvalidMove, InvalidTile};

/// The largest supported board edge.
pub const MAX_SIZE: u8 = 19;
pub(crate) const MAX_AREA: usize = MAX_SIZE as usize * MAX_SIZE as usize;

/// The state of a game of Go.
///
/// The ruleset is fixed: suicide is illegal, repetition is restricted by simple ko
/// (a placement may not recreate the grid configuration that existed immediately
/// before the opponent's last action), the game ends after two consecutive passes
/// and is scored by area (stones plus exclusively surrounded territory), without komi.
///
/// Boards are snapshot values: `play` mutates in place, and search agents work on
/// clones produced by [`GoBoard::clone_and_play`] so the authoritative state held by
/// a driver is never touched by lookahead.
#[derive(Clone, Eq, PartialEq)]
pub struct GoBoard {
    size: u8,
    grid: Vec<Option<Player>>,
    next_player: Player,
    state: State,
    ko_previous: Option<Zobrist>,
    grid_zobrist: Zobrist,
    move_number: u32,
}

/// Either a stone placement or a pass. Pass is always available on a live board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Move {
    Pass,
    Place(Tile),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum State {
    Normal,
    Passed,
    Done(Outcome),
}

struct PlacementSim {
    zobrist_next: Zobrist,
    captured: Vec<Tile>,
}

impl GoBoard {
    /// An empty board with Black to move. Panics if `size` is zero or above [`MAX_SIZE`];
    /// callers taking sizes from configuration validate first and report
    /// [`ConfigError`](crate::error::ConfigError) instead.
    pub fn new(size: u8) -> GoBoard {
        assert!(
            (1..=MAX_SIZE).contains(&size),
            "Board size {} out of range 1..={}",
            size,
            MAX_SIZE
        );
        GoBoard {
            size,
            grid: vec![None; size as usize * size as usize],
            next_player: Player::Black,
            state: State::Normal,
            ko_previous: None,
            grid_zobrist: Zobrist::default(),
            move_number: 0,
        }
    }

    pub(super) fn from_parts(
        size: u8,
        grid: Vec<Option<Player>>,
        next_player: Player,
        state: State,
    ) -> GoBoard {
        let mut grid_zobrist = Zobrist::default();
        for (index, stone) in grid.iter().enumerate() {
            if let Some(player) = stone {
                grid_zobrist ^= Zobrist::for_stone(*player, Tile::from_index(index, size));
            }
        }
        GoBoard {
            size,
            grid,
            next_player,
            state,
            ko_previous: None,
            grid_zobrist,
            move_number: 0,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn area(&self) -> u16 {
        self.size as u16 * self.size as u16
    }

    pub fn next_player(&self) -> Player {
        self.next_player
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn stone_at(&self, tile: Tile) -> Option<Player> {
        assert!(tile.exists(self.size), "Tile {:?} not on a size-{} board", tile, self.size);
        self.grid[tile.index(self.size)]
    }

    pub fn stone_count_of(&self, player: Player) -> u32 {
        self.grid.iter().filter(|&&s| s == Some(player)).count() as u32
    }

    /// The group containing the stone on `tile`, or `None` for an empty tile.
    /// Recomputed by flood fill on every call, never cached.
    pub fn group_at(&self, tile: Tile) -> Option<Group> {
        group::group_at(self.size, |t| self.grid[t.index(self.size)], tile)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            State::Normal | State::Passed => None,
            State::Done(outcome) => Some(outcome),
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn check_done(&self) -> Result<(), BoardDone> {
        match self.is_done() {
            false => Ok(()),
            true => Err(BoardDone),
        }
    }

    /// Whether the game is over: either both players just passed, or neither side
    /// has any legal placement left.
    pub fn is_terminal(&self) -> bool {
        self.is_done() || Player::BOTH.iter().all(|&player| !self.any_placement_available(player))
    }

    /// Hash of the stone configuration only.
    pub fn zobrist(&self) -> Zobrist {
        self.grid_zobrist
    }

    /// Full hash, including the next player and the pass state.
    pub fn zobrist_full(&self) -> Zobrist {
        self.grid_zobrist ^ Zobrist::for_turn(self.next_player) ^ Zobrist::for_pass_state(self.state)
    }

    /// A copy with the ko predecessor and move counter cleared, useful to compare
    /// boards that were reached through different move sequences.
    pub fn without_history(&self) -> GoBoard {
        GoBoard {
            ko_previous: None,
            move_number: 0,
            ..self.clone()
        }
    }

    /// Whether `mv` may be played on this board.
    pub fn is_available_move(&self, mv: Move) -> Result<bool, BoardDone> {
        self.check_done()?;

        let available = match mv {
            Move::Pass => true,
            Move::Place(tile) => self.simulate_placement(tile, self.next_player).is_ok(),
        };

        Ok(available)
    }

    /// Iterator over the available moves: pass first, then legal placements in
    /// row-major tile order. The ordering is deterministic for identical boards,
    /// which keeps seeded games reproducible.
    pub fn available_moves(&self) -> Result<AvailableMoves<'_>, BoardDone> {
        self.check_done()?;
        Ok(AvailableMoves { board: self })
    }

    /// Pick a uniformly random move from `available_moves`.
    pub fn random_available_move(&self, rng: &mut impl Rng) -> Result<Move, BoardDone> {
        let moves = self.available_moves()?;
        let count = moves.count();
        let index = rng.gen_range(0..count);
        Ok(self.available_moves()?.nth(index).unwrap())
    }

    pub fn play_random_available_move(&mut self, rng: &mut impl Rng) -> Result<(), BoardDone> {
        let mv = self.random_available_move(rng)?;
        self.play(mv).expect("available move must be playable");
        Ok(())
    }

    /// Play `mv`. This is the authoritative legality check, independent of
    /// [`GoBoard::available_moves`]: occupied, suicidal and ko-violating placements
    /// fail with the matching [`PlayError`] and leave the board untouched, so search
    /// agents may call this directly and treat an error as a pruned branch.
    pub fn play(&mut self, mv: Move) -> Result<(), PlayError> {
        self.check_done()?;

        let curr = self.next_player;

        match mv {
            Move::Pass => {
                self.ko_previous = Some(self.grid_zobrist);
                self.state = match self.state {
                    State::Normal => State::Passed,
                    State::Passed => State::Done(self.score().to_outcome()),
                    State::Done(_) => unreachable!(),
                };
            }
            Move::Place(tile) => {
                let sim = self.simulate_placement(tile, curr)?;

                self.ko_previous = Some(self.grid_zobrist);
                self.grid[tile.index(self.size)] = Some(curr);
                for &captured in &sim.captured {
                    self.grid[captured.index(self.size)] = None;
                }
                self.grid_zobrist = sim.zobrist_next;
                self.state = State::Normal;
            }
        }

        self.next_player = curr.other();
        self.move_number += 1;
        Ok(())
    }

    /// Clone this board, play `mv` on the clone and return it.
    pub fn clone_and_play(&self, mv: Move) -> Result<GoBoard, PlayError> {
        let mut next = self.clone();
        next.play(mv)?;
        Ok(next)
    }

    /// Hypothetically place a stone for `player` and report the resulting capture set
    /// and grid hash, without touching the board.
    fn simulate_placement(&self, tile: Tile, player: Player) -> Result<PlacementSim, PlayError> {
        if !tile.exists(self.size) {
            return Err(PlayError::OutOfBounds);
        }
        if self.grid[tile.index(self.size)].is_some() {
            return Err(PlayError::Occupied);
        }

        // the grid as it would look with the new stone placed, before captures
        let hypothetical = |t: Tile| {
            if t == tile {
                Some(player)
            } else {
                self.grid[t.index(self.size)]
            }
        };

        let mut captured: Vec<Tile> = vec![];
        for adj in tile.all_adjacent(self.size) {
            if hypothetical(adj) == Some(player.other()) && !captured.contains(&adj) {
                let group = group::group_at(self.size, hypothetical, adj).unwrap();
                if group.liberties == 0 {
                    captured.extend(group.stones);
                }
            }
        }

        if captured.is_empty() {
            let own = group::group_at(self.size, hypothetical, tile).unwrap();
            if own.liberties == 0 {
                return Err(PlayError::Suicide);
            }
        }

        let mut zobrist_next = self.grid_zobrist ^ Zobrist::for_stone(player, tile);
        for &c in &captured {
            zobrist_next ^= Zobrist::for_stone(player.other(), c);
        }

        if self.ko_previous == Some(zobrist_next) {
            return Err(PlayError::Ko);
        }

        Ok(PlacementSim { zobrist_next, captured })
    }

    fn any_placement_available(&self, player: Player) -> bool {
        Tile::all(self.size).any(|tile| self.simulate_placement(tile, player).is_ok())
    }
}

/// See [`GoBoard::available_moves`].
#[derive(Debug, Clone)]
pub struct AvailableMoves<'a> {
    board: &'a GoBoard,
}

impl InternalIterator for AvailableMoves<'_> {
    type Item = Move;

    fn try_for_each<R, F>(self, mut f: F) -> ControlFlow<R>
    where
        F: FnMut(Self::Item) -> ControlFlow<R>,
    {
        f(Move::Pass)?;
        for tile in Tile::all(self.board.size) {
            if self.board.simulate_placement(tile, self.board.next_player).is_ok() {
                f(Move::Place(tile))?;
            }
        }
        ControlFlow::Continue(())
    }
}

impl Hash for GoBoard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.zobrist_full().hash(state);
    }
}

impl Score {
    /// Strictly greater area score wins; equal scores are a draw. No komi.
    pub fn to_outcome(self) -> Outcome {
        match self.black.cmp(&self.white) {
            Ordering::Greater => Outcome::WonBy(Player::Black),
            Ordering::Less => Outcome::WonBy(Player::White),
            Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn for_player(self, player: Player) -> u32 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }
}
