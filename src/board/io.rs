//! Text input/output for tiles, moves and boards.
//!
//! The board format is a FEN-like string `"tiles next pass"`, e.g.
//! `".b./bw./... w 0"`: rows from top to bottom separated by `/`, then the next
//! player, then the number of consecutive passes.
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use itertools::Itertools;

use crate::board::{GoBoard, Move, State, Tile, MAX_SIZE};
use crate::player::Player;

// By convention 'I' is skipped because it can be confused with "1".
const TILE_X_NAMES: &[u8] = b"ABCDEFGHJKLMNOPQRSTU";

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", TILE_X_NAMES[self.x() as usize] as char, self.y() as u32 + 1)
    }
}

impl Debug for Tile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile(({}, {}), {})", self.x(), self.y(), self)
    }
}

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct InvalidTile;

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct InvalidMove;

impl FromStr for Tile {
    type Err = InvalidTile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check(s.len() >= 2 && s.is_ascii(), InvalidTile)?;

        let c = s.as_bytes()[0];
        let x = TILE_X_NAMES
            .iter()
            .position(|&cand| cand == c.to_ascii_uppercase())
            .ok_or(InvalidTile)?;

        let y_1 = s[1..].parse::<u32>().map_err(|_| InvalidTile)?;
        check(y_1 > 0, InvalidTile)?;
        let y = y_1 - 1;
        check(x < MAX_SIZE as usize && y < MAX_SIZE as u32, InvalidTile)?;

        Ok(Tile::new(x as u8, y as u8))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Pass => write!(f, "PASS"),
            Move::Place(tile) => write!(f, "{}", tile),
        }
    }
}

impl FromStr for Move {
    type Err = InvalidMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pass") {
            Ok(Move::Pass)
        } else {
            match Tile::from_str(s) {
                Ok(tile) => Ok(Move::Place(tile)),
                Err(InvalidTile) => Err(InvalidMove),
            }
        }
    }
}

impl Debug for GoBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GoBoard(next={}, state={:?}, move={}, stones_b={}, stones_w={}, fen={:?})",
            self.next_player().to_char(),
            self.state(),
            self.move_number(),
            self.stone_count_of(Player::Black),
            self.stone_count_of(Player::White),
            self.to_fen(),
        )
    }
}

impl Display for GoBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let size = self.size();
        let width_y = size.to_string().len();

        for y in (0..size).rev() {
            write!(f, "{:width$} ", y + 1, width = width_y)?;

            for x in 0..size {
                let c = match self.stone_at(Tile::new(x, y)) {
                    None => '.',
                    Some(player) => player.to_char(),
                };
                write!(f, "{}", c)?;
            }

            writeln!(f)?;
        }

        write!(f, "{:width$}", "", width = width_y + 1)?;
        for x in 0..size {
            write!(f, "{}", TILE_X_NAMES[x as usize] as char)?;
        }
        writeln!(f)?;

        Ok(())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InvalidFen {
    Syntax,
    InvalidChar,
    TooLarge,
    InvalidShape,
    HasDeadStones,
}

impl GoBoard {
    pub fn to_fen(&self) -> String {
        let size = self.size();
        let mut tiles = String::new();

        for y in (0..size).rev() {
            for x in 0..size {
                let c = match self.stone_at(Tile::new(x, y)) {
                    None => '.',
                    Some(player) => player.to_char(),
                };
                tiles.push(c);
            }
            if y != 0 {
                tiles.push('/');
            }
        }

        let pass_counter = match self.state() {
            State::Normal => 0,
            State::Passed => 1,
            State::Done(_) => 2,
        };

        format!("{} {} {}", tiles, self.next_player().to_char(), pass_counter)
    }

    /// Parse the format written by [`GoBoard::to_fen`]. The parsed board has no
    /// ko predecessor and a move counter of zero.
    pub fn from_fen(fen: &str) -> Result<GoBoard, InvalidFen> {
        let (tiles, next, pass) = match fen.split(' ').collect_vec().as_slice() {
            &[tiles, next, pass] => (tiles, next, pass),
            _ => return Err(InvalidFen::Syntax),
        };

        let lines = tiles.split('/').collect_vec();
        let size = lines.len();
        check(size <= MAX_SIZE as usize, InvalidFen::TooLarge)?;
        let size = size as u8;

        let mut grid = vec![None; size as usize * size as usize];
        for (y_rev, line) in lines.iter().enumerate() {
            let y = size as usize - 1 - y_rev;
            check(line.len() == size as usize, InvalidFen::InvalidShape)?;

            for (x, value) in line.chars().enumerate() {
                let stone = match value {
                    'b' => Some(Player::Black),
                    'w' => Some(Player::White),
                    '.' => None,
                    _ => return Err(InvalidFen::InvalidChar),
                };
                grid[Tile::new(x as u8, y as u8).index(size)] = stone;
            }
        }

        let next_player = match next {
            "b" => Player::Black,
            "w" => Player::White,
            _ => return Err(InvalidFen::InvalidChar),
        };

        let board = GoBoard::from_parts(size, grid, next_player, State::Normal);

        // a settled board can never contain a group without liberties
        for tile in Tile::all(size) {
            if let Some(group) = board.group_at(tile) {
                check(group.liberties > 0, InvalidFen::HasDeadStones)?;
            }
        }

        let state = match pass {
            "0" => State::Normal,
            "1" => State::Passed,
            "2" => State::Done(board.score().to_outcome()),
            _ => return Err(InvalidFen::InvalidChar),
        };

        Ok(GoBoard { state, ..board })
    }
}

fn check<E>(c: bool, e: E) -> Result<(), E> {
    match c {
        true => Ok(()),
        false => Err(e),
    }
}
