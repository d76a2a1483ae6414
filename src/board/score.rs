//! Area scoring: stones plus exclusively surrounded empty territory.
use crate::board::{GoBoard, Tile};
use crate::player::Player;

/// The area score of both players.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Score {
    pub black: u32,
    pub white: u32,
}

/// The partition of the empty points: counts of territory per owner.
///
/// A maximal connected empty region belongs to a player iff every stone bordering it
/// is theirs; regions bordering both colors or no stones at all are neutral.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Territory {
    pub black: u32,
    pub white: u32,
    pub neutral: u32,
}

impl Territory {
    pub fn total(self) -> u32 {
        self.black + self.white + self.neutral
    }
}

impl GoBoard {
    /// Partition the empty points into territory, walking each maximal empty region once.
    /// Only meaningful as a scoring artifact at game end, but total on any board.
    pub fn territory(&self) -> Territory {
        let size = self.size();
        let mut visited = vec![false; size as usize * size as usize];
        let mut territory = Territory::default();

        for start in Tile::all(size) {
            if self.stone_at(start).is_some() || visited[start.index(size)] {
                continue;
            }

            let mut region_len = 0u32;
            let mut borders_black = false;
            let mut borders_white = false;

            let mut stack = vec![start];
            visited[start.index(size)] = true;

            while let Some(curr) = stack.pop() {
                region_len += 1;

                for adj in curr.all_adjacent(size) {
                    match self.stone_at(adj) {
                        Some(Player::Black) => borders_black = true,
                        Some(Player::White) => borders_white = true,
                        None => {
                            if !visited[adj.index(size)] {
                                visited[adj.index(size)] = true;
                                stack.push(adj);
                            }
                        }
                    }
                }
            }

            match (borders_black, borders_white) {
                (true, false) => territory.black += region_len,
                (false, true) => territory.white += region_len,
                _ => territory.neutral += region_len,
            }
        }

        territory
    }

    /// Area score: live stones plus exclusive territory. Total on any board,
    /// typically read once both players have passed.
    pub fn score(&self) -> Score {
        let territory = self.territory();
        Score {
            black: self.stone_count_of(Player::Black) + territory.black,
            white: self.stone_count_of(Player::White) + territory.white,
        }
    }
}
