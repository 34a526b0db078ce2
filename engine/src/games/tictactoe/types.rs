use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// A player's symbol. Compared by value, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mark(Arc<str>);

impl Mark {
    pub fn new(symbol: &str) -> Self {
        Self(Arc::from(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Mark {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for Mark {
    fn from(symbol: String) -> Self {
        Self(Arc::from(symbol))
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Steps `distance` cells along `(d_row, d_col)`, `None` when leaving a `size`x`size` grid.
    pub(crate) fn offset(self, d_row: isize, d_col: isize, distance: isize, size: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row * distance)?;
        let col = self.col.checked_add_signed(d_col * distance)?;
        (row < size && col < size).then_some(Self { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Artificial pause before a computer move is shown.
    pub fn thinking_delay(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(400),
            Difficulty::Medium => Duration::from_millis(800),
            Difficulty::Hard => Duration::from_millis(1200),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Win { mark: Mark, cells: Vec<Position> },
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(&self) -> Option<&Mark> {
        match self {
            GameOutcome::Win { mark, .. } => Some(mark),
            _ => None,
        }
    }

    pub fn winning_cells(&self) -> &[Position] {
        match self {
            GameOutcome::Win { cells, .. } => cells,
            _ => &[],
        }
    }
}

/// Result of checking a single cell for a winning line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WinCheck {
    pub won: bool,
    pub cells: Vec<Position>,
}
