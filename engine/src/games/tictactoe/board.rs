use std::fmt;
use std::ops::{Deref, DerefMut};

use super::types::{Mark, Position};
use crate::{EngineError, EngineResult, IllegalMoveReason};

/// Square grid of cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Mark>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Option<Mark>>>) -> EngineResult<Self> {
        let size = rows.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(EngineError::NotSquare {
                rows: size,
                row,
                len: cells.len(),
            });
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds a board from one string per row, one character per cell.
    /// `.` and spaces are empty cells.
    pub fn from_text(rows: &[&str]) -> EngineResult<Self> {
        let rows = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        '.' | ' ' => None,
                        other => Some(Mark::from(other.to_string())),
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    /// Mark at `pos`, `None` for empty or off-board cells.
    pub fn get(&self, pos: Position) -> Option<&Mark> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells[self.index(pos)].as_ref()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.cells[self.index(pos)].is_none()
    }

    pub fn place(&mut self, pos: Position, mark: Mark) -> EngineResult<()> {
        if !self.in_bounds(pos) {
            return Err(EngineError::IllegalMove {
                position: pos,
                reason: IllegalMoveReason::OutOfBounds,
            });
        }
        let index = self.index(pos);
        if self.cells[index].is_some() {
            return Err(EngineError::IllegalMove {
                position: pos,
                reason: IllegalMoveReason::Occupied,
            });
        }
        self.cells[index] = Some(mark);
        Ok(())
    }

    /// Places `mark` on an empty cell for as long as the returned guard lives.
    pub(crate) fn place_scoped(&mut self, pos: Position, mark: Mark) -> ScopedPlacement<'_> {
        let index = self.index(pos);
        debug_assert!(self.cells[index].is_none(), "scoped placement on {}", pos);
        self.cells[index] = Some(mark);
        ScopedPlacement { board: self, index }
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    /// Empty cells in row-major order.
    pub fn available_moves(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.is_empty_at(pos)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                match self.get(Position::new(row, col)) {
                    Some(mark) => write!(f, "{}", mark)?,
                    None => write!(f, ".")?,
                }
            }
            if row + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Clears its cell again when dropped, including on early returns out of a search.
pub(crate) struct ScopedPlacement<'a> {
    board: &'a mut Board,
    index: usize,
}

impl Deref for ScopedPlacement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for ScopedPlacement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for ScopedPlacement<'_> {
    fn drop(&mut self) {
        self.board.cells[self.index] = None;
    }
}
