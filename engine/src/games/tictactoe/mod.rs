mod board;
mod bot_controller;
mod game_state;
mod session;
mod settings;
mod types;
mod win_detector;

pub use board::Board;
pub use bot_controller::{BotInput, MAX_SEARCH_DEPTH, select_move};
pub use game_state::RoundState;
pub use session::{
    ComputerMoveRequest, ComputerMoveResult, GameMode, MatchOptions, MatchSession, PlayerProfile,
    PlayerSlot, StartOption,
};
pub use settings::{GameSettings, MAX_GRID_SIZE, MIN_GRID_SIZE, MIN_WIN_LENGTH};
pub use types::{Difficulty, GameOutcome, Mark, Position, WinCheck};
pub use win_detector::{
    check_line_from, collect_winning_cells, evaluate_board, evaluate_outcome, evaluate_win_at,
};
