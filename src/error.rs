//! The error taxonomy shared by the rules engine and the agent configuration layer.
use thiserror::Error;

/// Returned when an operation that needs a playable board is called on a finished one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
#[error("board is done")]
pub struct BoardDone;

/// Returned by [`GoBoard::play`](crate::board::GoBoard::play) for moves that are not available.
///
/// All variants are recoverable: search agents treat them as "prune this branch",
/// while a driver receiving one from an agent-selected move is looking at an agent bug.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum PlayError {
    #[error("board is done")]
    BoardDone,
    #[error("tile is not on the board")]
    OutOfBounds,
    #[error("tile is already occupied")]
    Occupied,
    #[error("placement would be suicide")]
    Suicide,
    #[error("placement would recreate the previous position (ko)")]
    Ko,
}

impl From<BoardDone> for PlayError {
    fn from(_: BoardDone) -> Self {
        PlayError::BoardDone
    }
}

/// Fatal configuration problems, surfaced before any game starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown agent {0:?}")]
    UnknownAgent(String),
    #[error("malformed agent spec {0:?}")]
    MalformedSpec(String),
    #[error("invalid board size {0}, must be 1..={max}", max = crate::board::MAX_SIZE)]
    InvalidBoardSize(u32),
    #[error("invalid search depth {0}, must be positive")]
    InvalidDepth(u32),
    #[error("invalid iteration budget {0}, must be positive")]
    InvalidIterations(u64),
    #[error("parameter {name} is {value}, outside the valid range {range}")]
    ParamOutOfRange {
        name: &'static str,
        value: f32,
        range: &'static str,
    },
}
