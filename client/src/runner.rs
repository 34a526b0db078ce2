use std::time::Duration;

use nexus_engine::games::SessionRng;
use nexus_engine::games::tictactoe::{
    ComputerMoveRequest, ComputerMoveResult, GameOutcome, MatchSession, Position,
};
use nexus_engine::{EngineError, log};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::command::{Command, HELP_TEXT, parse_command};
use crate::config::ClientConfigManager;
use crate::render::{render_board, render_scores, render_status};

pub struct RunnerOptions {
    pub thinking_delay: bool,
}

struct ComputerMove {
    round_id: u64,
    position: Option<Position>,
}

enum Flow {
    Continue,
    Quit,
}

async fn read_stdin_lines(line_tx: mpsc::UnboundedSender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line_tx.send(line).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log!("stdin read failed: {}", e);
                break;
            }
        }
    }
}

fn spawn_computer_move(request: ComputerMoveRequest, delay: Option<Duration>) -> JoinHandle<ComputerMove> {
    tokio::spawn(async move {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let round_id = request.round_id;
        let position = match tokio::task::spawn_blocking(move || request.compute()).await {
            Ok(position) => position,
            Err(e) => {
                log!("move search for round {} failed: {}", round_id, e);
                None
            }
        };
        ComputerMove { round_id, position }
    })
}

async fn wait_pending(pending: &mut Option<JoinHandle<ComputerMove>>) -> Result<ComputerMove, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn describe_error(error: &EngineError) -> String {
    match error {
        EngineError::IllegalMove { position, reason } => {
            format!("row {}, column {}: {}", position.row + 1, position.col + 1, reason)
        }
        EngineError::NotYourTurn => "wait for the computer to move".to_string(),
        EngineError::RoundOver => "the round is over, type `new` to play again".to_string(),
        other => other.to_string(),
    }
}

fn save_preferences(config_manager: &ClientConfigManager, session: &MatchSession) {
    if let Err(e) = config_manager.update_config(|config| config.record_session(session)) {
        log!("failed to save preferences: {}", e);
        eprintln!("Could not save preferences: {}", e);
    }
}

fn print_round(session: &MatchSession) {
    println!("{}", render_board(session.round()));
    println!("{}", render_status(session));
}

struct Runner {
    session: MatchSession,
    rng: SessionRng,
    config_manager: ClientConfigManager,
    options: RunnerOptions,
}

impl Runner {
    fn after_move(&self, outcome: &GameOutcome) {
        print_round(&self.session);
        if outcome.is_terminal() {
            println!("{}", render_scores(&self.session));
            save_preferences(&self.config_manager, &self.session);
        }
    }

    fn restart(&mut self, result: Result<(), EngineError>) {
        match result {
            Ok(()) => {
                save_preferences(&self.config_manager, &self.session);
                print_round(&self.session);
            }
            Err(e) => println!("{}", describe_error(&e)),
        }
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Place(pos) => match self.session.play_human(pos) {
                Ok(outcome) => self.after_move(&outcome),
                Err(e) => println!("{}", describe_error(&e)),
            },
            Command::NewGame => {
                let result = self.session.new_round(&mut self.rng);
                self.restart(result);
            }
            Command::Scores => println!("{}", render_scores(&self.session)),
            Command::ResetScores => {
                self.session.reset_scores();
                save_preferences(&self.config_manager, &self.session);
                println!("{}", render_scores(&self.session));
            }
            Command::SetDifficulty(difficulty) => {
                self.session.set_difficulty(difficulty);
                save_preferences(&self.config_manager, &self.session);
                println!("Difficulty set to {}", difficulty);
            }
            Command::SetStart(start_option) => {
                let result = self.session.set_start_option(start_option, &mut self.rng);
                self.restart(result);
            }
            Command::SetHumanSide(side) => {
                let result = self.session.set_human_side(side, &mut self.rng);
                self.restart(result);
            }
            Command::Rename { slot, name } => match self.session.rename(slot, &name) {
                Ok(()) => {
                    save_preferences(&self.config_manager, &self.session);
                    println!("{}", render_scores(&self.session));
                }
                Err(e) => println!("{}", describe_error(&e)),
            },
            Command::SetSymbol { slot, symbol } => {
                let result = self.session.set_symbol(slot, &symbol, &mut self.rng);
                self.restart(result);
            }
            Command::SetSize {
                grid_size,
                win_length,
            } => {
                let resized = self.session.settings().with_grid_size(grid_size);
                let settings = match win_length {
                    Some(k) => resized.and_then(|settings| settings.with_win_length(k)),
                    None => resized,
                };
                let result =
                    settings.and_then(|settings| self.session.set_settings(settings, &mut self.rng));
                self.restart(result);
            }
            Command::SetMode(mode) => {
                let result = self.session.switch_mode(mode, &mut self.rng);
                self.restart(result);
            }
            Command::Help => println!("{}", HELP_TEXT),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn handle_computer_move(&mut self, computer_move: ComputerMove) {
        let Some(pos) = computer_move.position else {
            log!("no move available for round {}", computer_move.round_id);
            return;
        };
        let mover = self.session.current_slot();
        match self.session.apply_computer_move(computer_move.round_id, pos) {
            Ok(ComputerMoveResult::Applied(outcome)) => {
                let player = self.session.player(mover);
                println!("{} plays {} {}", player.name, pos.row + 1, pos.col + 1);
                self.after_move(&outcome);
            }
            Ok(ComputerMoveResult::Discarded) => {}
            Err(e) => log!("computer move {} rejected: {}", pos, e),
        }
    }

    fn thinking_delay(&self) -> Option<Duration> {
        self.options
            .thinking_delay
            .then(|| self.session.difficulty().thinking_delay())
    }
}

/// Drives one interactive match until `quit` or end of input.
pub async fn run(
    session: MatchSession,
    rng: SessionRng,
    config_manager: ClientConfigManager,
    options: RunnerOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_stdin_lines(line_tx));

    let mut runner = Runner {
        session,
        rng,
        config_manager,
        options,
    };
    let mut pending: Option<JoinHandle<ComputerMove>> = None;
    let mut input_open = true;

    println!("{}", HELP_TEXT);
    println!();
    println!("{}", render_scores(&runner.session));
    print_round(&runner.session);

    loop {
        if pending.is_none() {
            if let Some(request) = runner.session.computer_request(&mut runner.rng) {
                let name = &runner.session.player(runner.session.current_slot()).name;
                println!("{} is thinking...", name);
                pending = Some(spawn_computer_move(request, runner.thinking_delay()));
            }
        }
        if !input_open && pending.is_none() {
            break;
        }

        tokio::select! {
            finished = wait_pending(&mut pending) => {
                pending = None;
                match finished {
                    Ok(computer_move) => runner.handle_computer_move(computer_move),
                    Err(e) => log!("computer move task failed: {}", e),
                }
            }
            line = line_rx.recv(), if input_open => {
                let Some(line) = line else {
                    log!("input closed");
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => {
                        if let Flow::Quit = runner.handle_command(command) {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    if let Some(handle) = pending.take() {
        handle.abort();
    }
    save_preferences(&runner.config_manager, &runner.session);
    println!("Bye!");
    Ok(())
}
