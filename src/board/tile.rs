use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::board::MAX_SIZE;

// the flat index must fit in u16 and the column letter in a single character
const_assert!((MAX_SIZE as u16) * (MAX_SIZE as u16) < u16::MAX);
const_assert!(MAX_SIZE <= 25);

/// A single intersection on the board. `x` is the column, `y` the row, both starting
/// at zero in the lower-left corner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Tile {
    x: u8,
    y: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

impl Tile {
    pub fn new(x: u8, y: u8) -> Self {
        assert!(
            x < MAX_SIZE && y < MAX_SIZE,
            "Coordinates ({}, {}) too large, max={}",
            x,
            y,
            MAX_SIZE,
        );
        Tile { x, y }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    /// The row-major index of this tile on a board of the given size.
    pub fn index(self, size: u8) -> usize {
        debug_assert!(self.exists(size));
        size as usize * self.y as usize + self.x as usize
    }

    pub fn from_index(index: usize, size: u8) -> Tile {
        Tile::new((index % size as usize) as u8, (index / size as usize) as u8)
    }

    pub fn exists(&self, size: u8) -> bool {
        self.x < size && self.y < size
    }

    /// All tiles of a board of the given size, in row-major order.
    pub fn all(size: u8) -> impl Iterator<Item = Tile> {
        (0..size).flat_map(move |y| (0..size).map(move |x| Tile::new(x, y)))
    }

    pub fn adjacent_in(&self, dir: Direction, size: u8) -> Option<Tile> {
        let (x, y) = match dir {
            Direction::Up => (self.x, self.y.checked_add(1)?),
            Direction::Down => (self.x, self.y.checked_sub(1)?),
            Direction::Left => (self.x.checked_sub(1)?, self.y),
            Direction::Right => (self.x.checked_add(1)?, self.y),
        };
        if x < size && y < size {
            Some(Tile::new(x, y))
        } else {
            None
        }
    }

    pub fn all_adjacent(self, size: u8) -> impl Iterator<Item = Tile> + Clone {
        Direction::ALL
            .iter()
            .filter_map(move |&dir| self.adjacent_in(dir, size))
    }
}
