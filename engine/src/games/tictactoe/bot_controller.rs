use crate::games::SessionRng;
use crate::{EngineError, EngineResult, log};
use super::board::Board;
use super::settings::GameSettings;
use super::types::{Difficulty, Mark, Position};
use super::win_detector::{check_line_from, evaluate_board};

/// Plies searched before a position is scored as neutral.
pub const MAX_SEARCH_DEPTH: usize = 6;
const WIN_SCORE: i32 = 10;

/// Everything a strategy needs to choose a move. The board is a snapshot;
/// searching never touches the caller's board.
#[derive(Debug, Clone)]
pub struct BotInput {
    pub board: Board,
    pub mover: Mark,
    pub opponent: Mark,
    pub settings: GameSettings,
}

impl BotInput {
    pub fn new(board: Board, mover: Mark, opponent: Mark, settings: GameSettings) -> EngineResult<Self> {
        settings.check()?;
        if board.size() != settings.grid_size {
            return Err(EngineError::InvalidConfiguration {
                grid_size: board.size(),
                win_length: settings.win_length,
            });
        }
        if mover == opponent {
            return Err(EngineError::DuplicateMarks);
        }
        Ok(Self {
            board,
            mover,
            opponent,
            settings,
        })
    }
}

/// Chooses a cell for `input.mover`. `None` only when no empty cell is left,
/// or for `Hard` when the position is already decided.
pub fn select_move(difficulty: Difficulty, input: &BotInput, rng: &mut SessionRng) -> Option<Position> {
    let chosen = match difficulty {
        Difficulty::Easy => calculate_random_move(&input.board, rng),
        Difficulty::Medium => calculate_heuristic_move(input, rng),
        Difficulty::Hard => calculate_minimax_move(input),
    };
    if let Some(pos) = chosen {
        log!("{} bot plays {} at {}", difficulty, input.mover, pos);
    }
    chosen
}

fn calculate_random_move(board: &Board, rng: &mut SessionRng) -> Option<Position> {
    let available_moves = board.available_moves();
    rng.choose(&available_moves).copied()
}

fn calculate_heuristic_move(input: &BotInput, rng: &mut SessionRng) -> Option<Position> {
    let mut board = input.board.clone();
    let size = board.size();
    let win_length = input.settings.win_length;

    if let Some(pos) = find_winning_move(&mut board, &input.mover, win_length) {
        log!("medium: winning at {}", pos);
        return Some(pos);
    }

    if let Some(pos) = find_winning_move(&mut board, &input.opponent, win_length) {
        log!("medium: blocking {} at {}", input.opponent, pos);
        return Some(pos);
    }

    let center = Position::new(1, 1);
    if size == 3 && board.is_empty_at(center) {
        return Some(center);
    }

    let last = size - 1;
    let corners: Vec<Position> = [
        Position::new(0, 0),
        Position::new(0, last),
        Position::new(last, 0),
        Position::new(last, last),
    ]
    .into_iter()
    .filter(|&pos| board.is_empty_at(pos))
    .collect();
    if let Some(&corner) = rng.choose(&corners) {
        return Some(corner);
    }

    calculate_random_move(&board, rng)
}

/// First empty cell in row-major order that completes a line for `mark`.
fn find_winning_move(board: &mut Board, mark: &Mark, win_length: usize) -> Option<Position> {
    for pos in board.available_moves() {
        let placed = board.place_scoped(pos, mark.clone());
        if check_line_from(&placed, pos, mark, win_length) {
            return Some(pos);
        }
    }
    None
}

struct SearchContext<'a> {
    bot_mark: &'a Mark,
    opponent_mark: &'a Mark,
    win_length: usize,
}

struct SearchResult {
    score: i32,
    best_move: Option<Position>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self {
            score,
            best_move: None,
        }
    }
}

fn calculate_minimax_move(input: &BotInput) -> Option<Position> {
    let mut board = input.board.clone();
    let ctx = SearchContext {
        bot_mark: &input.mover,
        opponent_mark: &input.opponent,
        win_length: input.settings.win_length,
    };

    let result = minimax(&mut board, &ctx, 0, true, i32::MIN, i32::MAX);
    log!(
        "hard: best score {} over {} empty cells",
        result.score,
        input.board.available_moves().len()
    );
    result.best_move
}

fn minimax(
    board: &mut Board,
    ctx: &SearchContext<'_>,
    depth: usize,
    is_maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
) -> SearchResult {
    let depth_score = depth as i32;
    match evaluate_board(board, ctx.bot_mark, ctx.opponent_mark, ctx.win_length) {
        Some(winner) if winner == *ctx.bot_mark => return SearchResult::leaf(WIN_SCORE - depth_score),
        Some(_) => return SearchResult::leaf(depth_score - WIN_SCORE),
        None => {}
    }
    if board.is_full() || depth >= MAX_SEARCH_DEPTH {
        return SearchResult::leaf(0);
    }

    let mark = if is_maximizing {
        ctx.bot_mark
    } else {
        ctx.opponent_mark
    };
    let mut best = SearchResult {
        score: if is_maximizing { i32::MIN } else { i32::MAX },
        best_move: None,
    };

    let size = board.size();
    'rows: for row in 0..size {
        for col in 0..size {
            let pos = Position::new(row, col);
            if !board.is_empty_at(pos) {
                continue;
            }

            let score = {
                let mut placed = board.place_scoped(pos, mark.clone());
                minimax(&mut placed, ctx, depth + 1, !is_maximizing, alpha, beta).score
            };

            if is_maximizing {
                if score > best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(pos),
                    };
                }
                alpha = alpha.max(score);
            } else {
                if score < best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(pos),
                    };
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                break 'rows;
            }
        }
    }

    best
}
