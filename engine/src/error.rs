use std::fmt;

use thiserror::Error;

use crate::games::tictactoe::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    Occupied,
    OutOfBounds,
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMoveReason::Occupied => write!(f, "cell is already marked"),
            IllegalMoveReason::OutOfBounds => write!(f, "position is out of bounds"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("win length {win_length} must be between 3 and the grid size {grid_size}")]
    InvalidConfiguration { grid_size: usize, win_length: usize },

    #[error("grid size {grid_size} must be between {min} and {max}")]
    GridSizeOutOfRange {
        grid_size: usize,
        min: usize,
        max: usize,
    },

    #[error("board is not square: row {row} has {len} cells, expected {rows}")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("illegal move at {position}: {reason}")]
    IllegalMove {
        position: Position,
        reason: IllegalMoveReason,
    },

    #[error("round is already over")]
    RoundOver,

    #[error("it is not the human player's turn")]
    NotYourTurn,

    #[error("players must use different symbols")]
    DuplicateMarks,

    #[error("player symbol must not be empty")]
    EmptyMark,

    #[error("player name must not be empty")]
    EmptyName,

    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error("unknown start option '{0}' (expected player1, player2, alternate or random)")]
    UnknownStartOption(String),

    #[error("unknown game mode '{0}' (expected pvp or pvc)")]
    UnknownGameMode(String),

    #[error("unknown player '{0}' (expected 1 or 2)")]
    UnknownPlayerSlot(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
