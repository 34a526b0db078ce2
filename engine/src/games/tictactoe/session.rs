use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::bot_controller::{BotInput, select_move};
use super::game_state::RoundState;
use super::settings::GameSettings;
use super::types::{Difficulty, GameOutcome, Mark, Position};
use crate::games::SessionRng;
use crate::{EngineError, EngineResult, log};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub games: u32,
}

impl PlayerProfile {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            score: 0,
            games: 0,
        }
    }

    pub fn mark(&self) -> Mark {
        Mark::new(&self.symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSlot {
    #[default]
    Player1,
    Player2,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::Player1 => PlayerSlot::Player2,
            PlayerSlot::Player2 => PlayerSlot::Player1,
        }
    }

    fn index(self) -> usize {
        match self {
            PlayerSlot::Player1 => 0,
            PlayerSlot::Player2 => 1,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::Player1 => write!(f, "player 1"),
            PlayerSlot::Player2 => write!(f, "player 2"),
        }
    }
}

impl FromStr for PlayerSlot {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "p1" | "player1" => Ok(PlayerSlot::Player1),
            "2" | "p2" | "player2" => Ok(PlayerSlot::Player2),
            _ => Err(EngineError::UnknownPlayerSlot(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Pvp,
    Pvc,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Pvp => write!(f, "pvp"),
            GameMode::Pvc => write!(f, "pvc"),
        }
    }
}

impl FromStr for GameMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" => Ok(GameMode::Pvp),
            "pvc" => Ok(GameMode::Pvc),
            _ => Err(EngineError::UnknownGameMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartOption {
    Player1,
    Player2,
    #[default]
    Alternate,
    Random,
}

impl FromStr for StartOption {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p1" | "player1" => Ok(StartOption::Player1),
            "p2" | "player2" => Ok(StartOption::Player2),
            "alternate" => Ok(StartOption::Alternate),
            "random" => Ok(StartOption::Random),
            _ => Err(EngineError::UnknownStartOption(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub player1: PlayerProfile,
    pub player2: PlayerProfile,
    pub mode: GameMode,
    pub human_side: PlayerSlot,
    pub difficulty: Difficulty,
    pub start_option: StartOption,
    pub settings: GameSettings,
}

/// Snapshot handed to whoever computes the computer's move.
#[derive(Debug, Clone)]
pub struct ComputerMoveRequest {
    pub round_id: u64,
    pub difficulty: Difficulty,
    pub input: BotInput,
    pub seed: u64,
}

impl ComputerMoveRequest {
    pub fn compute(&self) -> Option<Position> {
        let mut rng = SessionRng::new(self.seed);
        select_move(self.difficulty, &self.input, &mut rng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputerMoveResult {
    Applied(GameOutcome),
    /// The round the move was computed for has been replaced.
    Discarded,
}

pub struct MatchSession {
    players: [PlayerProfile; 2],
    stored_names: [String; 2],
    mode: GameMode,
    human_side: PlayerSlot,
    difficulty: Difficulty,
    start_option: StartOption,
    last_starter: PlayerSlot,
    starter: PlayerSlot,
    settings: GameSettings,
    round: RoundState,
    round_id: u64,
}

impl MatchSession {
    pub fn new(options: MatchOptions, rng: &mut SessionRng) -> EngineResult<Self> {
        options.settings.check()?;
        let round = RoundState::new(
            options.settings,
            options.player1.mark(),
            options.player2.mark(),
        )?;

        let stored_names = [options.player1.name.clone(), options.player2.name.clone()];
        let mut session = Self {
            players: [options.player1, options.player2],
            stored_names,
            mode: options.mode,
            human_side: options.human_side,
            difficulty: options.difficulty,
            start_option: options.start_option,
            last_starter: PlayerSlot::Player2,
            starter: PlayerSlot::Player1,
            settings: options.settings,
            round,
            round_id: 0,
        };
        session.refresh_names();
        session.new_round(rng)?;
        Ok(session)
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerProfile {
        &self.players[slot.index()]
    }

    /// Profiles with the names the players chose, never the computer's label.
    pub fn stored_profile(&self, slot: PlayerSlot) -> PlayerProfile {
        PlayerProfile {
            name: self.stored_names[slot.index()].clone(),
            ..self.player(slot).clone()
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn human_side(&self) -> PlayerSlot {
        self.human_side
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn start_option(&self) -> StartOption {
        self.start_option
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn starter(&self) -> PlayerSlot {
        self.starter
    }

    pub fn computer_slot(&self) -> Option<PlayerSlot> {
        match self.mode {
            GameMode::Pvp => None,
            GameMode::Pvc => Some(self.human_side.other()),
        }
    }

    pub fn slot_of(&self, mark: &Mark) -> PlayerSlot {
        if *mark == self.players[0].mark() {
            PlayerSlot::Player1
        } else {
            PlayerSlot::Player2
        }
    }

    pub fn current_slot(&self) -> PlayerSlot {
        self.slot_of(self.round.current_mark())
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.round.is_over() && self.computer_slot() == Some(self.current_slot())
    }

    fn pick_starter(&self, rng: &mut SessionRng) -> PlayerSlot {
        match self.start_option {
            StartOption::Player1 => PlayerSlot::Player1,
            StartOption::Player2 => PlayerSlot::Player2,
            StartOption::Alternate => self.last_starter.other(),
            StartOption::Random => {
                if rng.random_bool() {
                    PlayerSlot::Player1
                } else {
                    PlayerSlot::Player2
                }
            }
        }
    }

    /// Discards the current board and starts an empty one.
    pub fn new_round(&mut self, rng: &mut SessionRng) -> EngineResult<()> {
        let starter = self.pick_starter(rng);
        let first = self.player(starter).mark();
        let second = self.player(starter.other()).mark();
        self.round = RoundState::new(self.settings, first, second)?;
        self.starter = starter;
        self.last_starter = starter;
        self.round_id += 1;
        log!(
            "round {} started: {}x{}, {} in a row, {} ({}) moves first",
            self.round_id,
            self.settings.grid_size,
            self.settings.grid_size,
            self.settings.win_length,
            self.player(starter).name,
            self.player(starter).symbol
        );
        Ok(())
    }

    pub fn play_human(&mut self, pos: Position) -> EngineResult<GameOutcome> {
        if self.is_computer_turn() {
            return Err(EngineError::NotYourTurn);
        }
        self.apply(pos)
    }

    /// `None` unless the computer is to move in an unfinished round.
    pub fn computer_request(&self, rng: &mut SessionRng) -> Option<ComputerMoveRequest> {
        if !self.is_computer_turn() {
            return None;
        }
        let input = BotInput {
            board: self.round.board().clone(),
            mover: self.round.current_mark().clone(),
            opponent: self.round.waiting_mark().clone(),
            settings: self.settings,
        };
        Some(ComputerMoveRequest {
            round_id: self.round_id,
            difficulty: self.difficulty,
            input,
            seed: rng.next_seed(),
        })
    }

    pub fn apply_computer_move(&mut self, round_id: u64, pos: Position) -> EngineResult<ComputerMoveResult> {
        if round_id != self.round_id {
            log!(
                "discarding computer move {} for round {}, current round is {}",
                pos,
                round_id,
                self.round_id
            );
            return Ok(ComputerMoveResult::Discarded);
        }
        if !self.is_computer_turn() {
            return Err(EngineError::NotYourTurn);
        }
        self.apply(pos).map(ComputerMoveResult::Applied)
    }

    fn apply(&mut self, pos: Position) -> EngineResult<GameOutcome> {
        let outcome = self.round.apply_move(pos)?.clone();
        match &outcome {
            GameOutcome::Win { mark, .. } => {
                let winner = self.slot_of(mark);
                self.players[winner.index()].score += 1;
                self.players.iter_mut().for_each(|p| p.games += 1);
                log!("round {} won by {}", self.round_id, self.player(winner).name);
            }
            GameOutcome::Draw => {
                self.players.iter_mut().for_each(|p| p.games += 1);
                log!("round {} drawn", self.round_id);
            }
            GameOutcome::InProgress => {}
        }
        Ok(outcome)
    }

    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
            player.games = 0;
        }
    }

    fn refresh_names(&mut self) {
        self.players[0].name = self.stored_names[0].clone();
        self.players[1].name = self.stored_names[1].clone();
        if let Some(computer) = self.computer_slot() {
            self.players[computer.index()].name = format!("AI ({})", self.difficulty);
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.refresh_names();
    }

    pub fn set_start_option(&mut self, start_option: StartOption, rng: &mut SessionRng) -> EngineResult<()> {
        self.start_option = start_option;
        self.new_round(rng)
    }

    /// Changes a player's chosen name. A computer player keeps its label until PvP.
    pub fn rename(&mut self, slot: PlayerSlot, name: &str) -> EngineResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        self.stored_names[slot.index()] = name.to_string();
        self.refresh_names();
        Ok(())
    }

    /// Changes a player's symbol and starts a new round, since the board marks change.
    pub fn set_symbol(&mut self, slot: PlayerSlot, symbol: &str, rng: &mut SessionRng) -> EngineResult<()> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(EngineError::EmptyMark);
        }
        if self.player(slot.other()).symbol == symbol {
            return Err(EngineError::DuplicateMarks);
        }
        self.players[slot.index()].symbol = symbol.to_string();
        self.new_round(rng)
    }

    pub fn switch_mode(&mut self, mode: GameMode, rng: &mut SessionRng) -> EngineResult<()> {
        self.mode = mode;
        self.refresh_names();
        self.new_round(rng)
    }

    pub fn set_human_side(&mut self, side: PlayerSlot, rng: &mut SessionRng) -> EngineResult<()> {
        self.human_side = side;
        self.refresh_names();
        self.new_round(rng)
    }

    pub fn set_settings(&mut self, settings: GameSettings, rng: &mut SessionRng) -> EngineResult<()> {
        settings.check()?;
        self.settings = settings;
        self.new_round(rng)
    }

    pub fn set_grid_size(&mut self, grid_size: usize, rng: &mut SessionRng) -> EngineResult<()> {
        let settings = self.settings.with_grid_size(grid_size)?;
        self.set_settings(settings, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(mode: GameMode, start_option: StartOption) -> MatchOptions {
        MatchOptions {
            player1: PlayerProfile::new("X", "Ada"),
            player2: PlayerProfile::new("O", "Grace"),
            mode,
            human_side: PlayerSlot::Player1,
            difficulty: Difficulty::Medium,
            start_option,
            settings: GameSettings::default(),
        }
    }

    fn play_all(session: &mut MatchSession, moves: &[(usize, usize)]) -> GameOutcome {
        let mut outcome = GameOutcome::InProgress;
        for &(row, col) in moves {
            outcome = session.play_human(Position::new(row, col)).unwrap();
        }
        outcome
    }

    #[test]
    fn test_alternate_start_flips_each_round() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Alternate), &mut rng).unwrap();
        assert_eq!(session.starter(), PlayerSlot::Player1);
        session.new_round(&mut rng).unwrap();
        assert_eq!(session.starter(), PlayerSlot::Player2);
        assert_eq!(session.round().current_mark(), &Mark::new("O"));
        session.new_round(&mut rng).unwrap();
        assert_eq!(session.starter(), PlayerSlot::Player1);
    }

    #[test]
    fn test_fixed_start_option() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player2), &mut rng).unwrap();
        for _ in 0..3 {
            assert_eq!(session.starter(), PlayerSlot::Player2);
            session.new_round(&mut rng).unwrap();
        }
    }

    #[test]
    fn test_win_updates_scores() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player1), &mut rng).unwrap();
        let outcome = play_all(&mut session, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(outcome.winner(), Some(&Mark::new("X")));
        assert_eq!(session.player(PlayerSlot::Player1).score, 1);
        assert_eq!(session.player(PlayerSlot::Player1).games, 1);
        assert_eq!(session.player(PlayerSlot::Player2).score, 0);
        assert_eq!(session.player(PlayerSlot::Player2).games, 1);
        assert_eq!(session.play_human(Position::new(2, 2)), Err(EngineError::RoundOver));
    }

    #[test]
    fn test_draw_counts_game_for_both() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player1), &mut rng).unwrap();
        let outcome = play_all(
            &mut session,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );
        assert_eq!(outcome, GameOutcome::Draw);
        assert_eq!(session.player(PlayerSlot::Player1).games, 1);
        assert_eq!(session.player(PlayerSlot::Player2).games, 1);
        assert_eq!(session.player(PlayerSlot::Player1).score, 0);

        session.reset_scores();
        assert_eq!(session.player(PlayerSlot::Player1).games, 0);
    }

    #[test]
    fn test_pvc_names_and_turns() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvc, StartOption::Player2), &mut rng).unwrap();
        assert_eq!(session.player(PlayerSlot::Player2).name, "AI (medium)");
        assert_eq!(session.stored_profile(PlayerSlot::Player2).name, "Grace");
        assert!(session.is_computer_turn());
        assert_eq!(session.play_human(Position::new(0, 0)), Err(EngineError::NotYourTurn));

        let request = session.computer_request(&mut rng).unwrap();
        let pos = request.compute().unwrap();
        let result = session.apply_computer_move(request.round_id, pos).unwrap();
        assert_eq!(result, ComputerMoveResult::Applied(GameOutcome::InProgress));
        assert!(!session.is_computer_turn());
        assert!(session.computer_request(&mut rng).is_none());

        session.set_difficulty(Difficulty::Hard);
        assert_eq!(session.player(PlayerSlot::Player2).name, "AI (hard)");
        session.switch_mode(GameMode::Pvp, &mut rng).unwrap();
        assert_eq!(session.player(PlayerSlot::Player2).name, "Grace");
    }

    #[test]
    fn test_stale_computer_move_is_discarded() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvc, StartOption::Player2), &mut rng).unwrap();
        let request = session.computer_request(&mut rng).unwrap();
        let pos = request.compute().unwrap();

        session.new_round(&mut rng).unwrap();
        let result = session.apply_computer_move(request.round_id, pos).unwrap();
        assert_eq!(result, ComputerMoveResult::Discarded);
        assert!(session.round().board().is_empty());
    }

    #[test]
    fn test_computer_request_does_not_touch_round() {
        let mut rng = SessionRng::new(4);
        let mut session = MatchSession::new(options(GameMode::Pvc, StartOption::Player1), &mut rng).unwrap();
        session.play_human(Position::new(1, 1)).unwrap();
        let before = session.round().board().clone();
        let request = session.computer_request(&mut rng).unwrap();
        request.compute().unwrap();
        assert_eq!(session.round().board(), &before);
    }

    #[test]
    fn test_grid_change_clamps_and_restarts() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player1), &mut rng).unwrap();
        session
            .set_settings(GameSettings::new(6, 5).unwrap(), &mut rng)
            .unwrap();
        session.play_human(Position::new(0, 0)).unwrap();
        session.set_grid_size(4, &mut rng).unwrap();
        assert_eq!(session.settings(), GameSettings::new(4, 4).unwrap());
        assert_eq!(session.round().board().size(), 4);
        assert!(session.round().board().is_empty());
        assert!(session.set_grid_size(9, &mut rng).is_err());
    }

    #[test]
    fn test_duplicate_symbols_rejected() {
        let mut rng = SessionRng::new(0);
        let mut opts = options(GameMode::Pvp, StartOption::Player1);
        opts.player2.symbol = "X".to_string();
        assert!(matches!(
            MatchSession::new(opts, &mut rng),
            Err(EngineError::DuplicateMarks)
        ));
    }

    #[test]
    fn test_switching_sides_moves_the_computer() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvc, StartOption::Player1), &mut rng).unwrap();
        session.play_human(Position::new(1, 1)).unwrap();
        let round_id = session.round_id();

        session.set_human_side(PlayerSlot::Player2, &mut rng).unwrap();
        assert_eq!(session.computer_slot(), Some(PlayerSlot::Player1));
        assert_eq!(session.player(PlayerSlot::Player1).name, "AI (medium)");
        assert_eq!(session.player(PlayerSlot::Player2).name, "Grace");
        assert_eq!(session.round_id(), round_id + 1);
        assert!(session.round().board().is_empty());
        assert!(session.is_computer_turn());
    }

    #[test]
    fn test_start_option_change_restarts_round() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player1), &mut rng).unwrap();
        session.play_human(Position::new(0, 0)).unwrap();
        let round_id = session.round_id();

        session.set_start_option(StartOption::Player2, &mut rng).unwrap();
        assert_eq!(session.start_option(), StartOption::Player2);
        assert_eq!(session.round_id(), round_id + 1);
        assert_eq!(session.starter(), PlayerSlot::Player2);
        assert!(session.round().board().is_empty());
    }

    #[test]
    fn test_rename_keeps_computer_label() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvc, StartOption::Player1), &mut rng).unwrap();
        session.rename(PlayerSlot::Player1, "  Linus ").unwrap();
        session.rename(PlayerSlot::Player2, "Ken").unwrap();
        assert_eq!(session.player(PlayerSlot::Player1).name, "Linus");
        assert_eq!(session.player(PlayerSlot::Player2).name, "AI (medium)");
        assert_eq!(session.stored_profile(PlayerSlot::Player2).name, "Ken");
        assert_eq!(session.rename(PlayerSlot::Player1, "   "), Err(EngineError::EmptyName));

        session.switch_mode(GameMode::Pvp, &mut rng).unwrap();
        assert_eq!(session.player(PlayerSlot::Player2).name, "Ken");
    }

    #[test]
    fn test_symbol_change_restarts_with_new_marks() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player1), &mut rng).unwrap();
        session.play_human(Position::new(0, 0)).unwrap();

        session.set_symbol(PlayerSlot::Player1, "★", &mut rng).unwrap();
        assert!(session.round().board().is_empty());
        assert_eq!(session.round().current_mark(), &Mark::new("★"));
        session.play_human(Position::new(2, 2)).unwrap();
        assert_eq!(session.round().board().get(Position::new(2, 2)), Some(&Mark::new("★")));
        assert_eq!(session.stored_profile(PlayerSlot::Player1).symbol, "★");
    }

    #[test]
    fn test_bad_symbol_leaves_session_unchanged() {
        let mut rng = SessionRng::new(0);
        let mut session = MatchSession::new(options(GameMode::Pvp, StartOption::Player1), &mut rng).unwrap();
        session.play_human(Position::new(1, 1)).unwrap();
        let round_id = session.round_id();

        assert_eq!(
            session.set_symbol(PlayerSlot::Player2, "X", &mut rng),
            Err(EngineError::DuplicateMarks)
        );
        assert_eq!(
            session.set_symbol(PlayerSlot::Player2, " ", &mut rng),
            Err(EngineError::EmptyMark)
        );
        assert_eq!(session.player(PlayerSlot::Player2).symbol, "O");
        assert_eq!(session.round_id(), round_id);
        assert_eq!(session.round().board().occupied_count(), 1);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("p1".parse::<StartOption>().unwrap(), StartOption::Player1);
        assert_eq!("Random".parse::<StartOption>().unwrap(), StartOption::Random);
        assert_eq!("PVC".parse::<GameMode>().unwrap(), GameMode::Pvc);
        assert_eq!("2".parse::<PlayerSlot>().unwrap(), PlayerSlot::Player2);
        assert!("both".parse::<StartOption>().is_err());
    }
}
