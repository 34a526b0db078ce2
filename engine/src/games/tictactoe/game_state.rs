use super::board::Board;
use super::settings::GameSettings;
use super::types::{GameOutcome, Mark, Position};
use super::win_detector::evaluate_outcome;
use crate::{EngineError, EngineResult};

/// A single round: one board, two alternating marks, monotonic outcome.
#[derive(Debug, Clone)]
pub struct RoundState {
    board: Board,
    settings: GameSettings,
    first_mark: Mark,
    second_mark: Mark,
    current_mark: Mark,
    outcome: GameOutcome,
    last_move: Option<Position>,
}

impl RoundState {
    pub fn new(settings: GameSettings, first_mark: Mark, second_mark: Mark) -> EngineResult<Self> {
        settings.check()?;
        if first_mark.as_str().is_empty() || second_mark.as_str().is_empty() {
            return Err(EngineError::EmptyMark);
        }
        if first_mark == second_mark {
            return Err(EngineError::DuplicateMarks);
        }

        Ok(Self {
            board: Board::new(settings.grid_size),
            settings,
            current_mark: first_mark.clone(),
            first_mark,
            second_mark,
            outcome: GameOutcome::InProgress,
            last_move: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn current_mark(&self) -> &Mark {
        &self.current_mark
    }

    pub fn waiting_mark(&self) -> &Mark {
        self.other_mark(&self.current_mark)
    }

    fn other_mark(&self, mark: &Mark) -> &Mark {
        if *mark == self.first_mark {
            &self.second_mark
        } else {
            &self.first_mark
        }
    }

    pub fn outcome(&self) -> &GameOutcome {
        &self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn winning_cells(&self) -> &[Position] {
        self.outcome.winning_cells()
    }

    /// Places the current mark at `pos`, then settles win, draw or turn switch.
    pub fn apply_move(&mut self, pos: Position) -> EngineResult<&GameOutcome> {
        if self.is_over() {
            return Err(EngineError::RoundOver);
        }

        self.board.place(pos, self.current_mark.clone())?;
        self.last_move = Some(pos);
        self.outcome = evaluate_outcome(&self.board, pos, self.settings.win_length);

        if !self.outcome.is_terminal() {
            self.current_mark = self.other_mark(&self.current_mark).clone();
        }

        Ok(&self.outcome)
    }
}
