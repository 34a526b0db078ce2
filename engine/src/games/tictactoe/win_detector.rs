use super::board::Board;
use super::types::{GameOutcome, Mark, Position, WinCheck};

/// Horizontal, vertical, diagonal down-right, diagonal down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

fn run_length(board: &Board, origin: Position, mark: &Mark, d_row: isize, d_col: isize) -> usize {
    (1..)
        .map_while(|distance| {
            origin
                .offset(d_row, d_col, distance, board.size())
                .filter(|&pos| board.get(pos) == Some(mark))
        })
        .count()
}

fn run_cells(board: &Board, origin: Position, mark: &Mark, d_row: isize, d_col: isize) -> Vec<Position> {
    (1..)
        .map_while(|distance| {
            origin
                .offset(d_row, d_col, distance, board.size())
                .filter(|&pos| board.get(pos) == Some(mark))
        })
        .collect()
}

/// True if `mark` has at least `win_length` in a row through `origin` in any direction.
///
/// The origin counts as one cell of the run, so the caller places the mark
/// there before asking.
pub fn check_line_from(board: &Board, origin: Position, mark: &Mark, win_length: usize) -> bool {
    if !board.in_bounds(origin) {
        return false;
    }
    DIRECTIONS.iter().any(|&(d_row, d_col)| {
        let count = 1
            + run_length(board, origin, mark, d_row, d_col)
            + run_length(board, origin, mark, -d_row, -d_col);
        count >= win_length
    })
}

/// Cells of the first qualifying line through `origin`, empty when there is none.
///
/// Ordered origin first, then outward in the positive direction, then outward
/// in the negative direction.
pub fn collect_winning_cells(board: &Board, origin: Position, win_length: usize) -> Vec<Position> {
    let Some(mark) = board.get(origin) else {
        return Vec::new();
    };

    for (d_row, d_col) in DIRECTIONS {
        let mut cells = vec![origin];
        cells.extend(run_cells(board, origin, mark, d_row, d_col));
        cells.extend(run_cells(board, origin, mark, -d_row, -d_col));
        if cells.len() >= win_length {
            return cells;
        }
    }

    Vec::new()
}

pub fn evaluate_win_at(board: &Board, origin: Position, win_length: usize) -> WinCheck {
    let cells = collect_winning_cells(board, origin, win_length);
    WinCheck {
        won: !cells.is_empty(),
        cells,
    }
}

/// Scans every occupied cell for a winning line of either mark.
///
/// Cells holding any glyph other than `mark_a` or `mark_b` never count as a
/// winner. With two players on the board this is every occupied cell.
pub fn evaluate_board(board: &Board, mark_a: &Mark, mark_b: &Mark, win_length: usize) -> Option<Mark> {
    board.positions().find_map(|pos| {
        let mark = board.get(pos)?;
        if mark != mark_a && mark != mark_b {
            return None;
        }
        check_line_from(board, pos, mark, win_length).then(|| mark.clone())
    })
}

/// Outcome after a move at `last_move`. Win is checked before fullness.
pub fn evaluate_outcome(board: &Board, last_move: Position, win_length: usize) -> GameOutcome {
    if let Some(mark) = board.get(last_move) {
        let cells = collect_winning_cells(board, last_move, win_length);
        if !cells.is_empty() {
            return GameOutcome::Win {
                mark: mark.clone(),
                cells,
            };
        }
    }

    if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
