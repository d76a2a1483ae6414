use std::fmt::{Debug, Formatter};

use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro64StarStar;

use crate::board::{State, Tile, MAX_AREA, MAX_SIZE};
use crate::player::Player;

/// An incremental hash of a board configuration.
///
/// Keys are generated once per process from a fixed seed, so values are stable
/// within a run and across runs of the same build. Two boards with equal tile
/// contents always have equal hashes; the converse holds only up to the usual
/// Zobrist collision probability, which is why the Q-learning table does NOT
/// use this type as its key (see [`StateKey`](crate::agent::qlearn::StateKey)).
#[derive(Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Zobrist(u64);

struct ZobristKeys {
    stone: [[u64; MAX_AREA]; 2],
    turn: [u64; 2],
    pass: [u64; 3],
}

lazy_static! {
    static ref KEYS: ZobristKeys = ZobristKeys::generate();
}

impl ZobristKeys {
    fn generate() -> ZobristKeys {
        let mut rng = Xoroshiro64StarStar::seed_from_u64(0x_6f62_6164_756b);

        let mut keys = ZobristKeys {
            stone: [[0; MAX_AREA]; 2],
            turn: [0; 2],
            pass: [0; 3],
        };

        for player in 0..2 {
            for tile in 0..MAX_AREA {
                keys.stone[player][tile] = rng.gen();
            }
        }
        keys.turn = rng.gen();
        keys.pass = rng.gen();

        keys
    }
}

impl Zobrist {
    pub fn for_stone(player: Player, tile: Tile) -> Zobrist {
        Zobrist(KEYS.stone[player.index() as usize][tile.index(MAX_SIZE)])
    }

    pub fn for_turn(player: Player) -> Zobrist {
        Zobrist(KEYS.turn[player.index() as usize])
    }

    pub fn for_pass_state(state: State) -> Zobrist {
        // the outcome itself is implicit from the tiles, don't hash it
        let index = match state {
            State::Normal => 0,
            State::Passed => 1,
            State::Done(_) => 2,
        };
        Zobrist(KEYS.pass[index])
    }
}

impl Debug for Zobrist {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zobrist({:#018x})", self.0)
    }
}

impl std::ops::BitXor for Zobrist {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Zobrist(self.0 ^ rhs.0)
    }
}

impl std::ops::BitXorAssign for Zobrist {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}
