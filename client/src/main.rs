mod command;
mod config;
mod render;
mod runner;

use std::path::PathBuf;

use clap::Parser;
use nexus_engine::games::SessionRng;
use nexus_engine::games::tictactoe::{Difficulty, GameMode, MatchSession, PlayerSlot, StartOption};
use nexus_engine::log;
use nexus_engine::logger::init_logger;

use config::{Config, Validate, get_config_manager};
use runner::RunnerOptions;

#[derive(Parser, Debug)]
#[command(name = "nexus_tictactoe", about = "N x N tic-tac-toe in the terminal, against a friend or the computer")]
struct Args {
    /// Path to the YAML file holding scores and preferences
    #[arg(long)]
    config: Option<PathBuf>,

    /// pvp or pvc
    #[arg(long)]
    mode: Option<GameMode>,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    #[arg(long)]
    grid_size: Option<usize>,

    #[arg(long)]
    win_length: Option<usize>,

    /// Which player the human controls against the computer (1 or 2)
    #[arg(long)]
    human_side: Option<PlayerSlot>,

    /// player1, player2, alternate or random
    #[arg(long)]
    start: Option<StartOption>,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the computer's thinking pause
    #[arg(long, default_value_t = false)]
    no_delay: bool,

    #[arg(long, default_value_t = false)]
    use_log_prefix: bool,

    /// Disable diagnostic logging
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

impl Args {
    fn apply_to(&self, config: &mut Config) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mode) = self.mode {
            config.game_mode = mode;
        }
        if let Some(difficulty) = self.difficulty {
            config.ai_difficulty = difficulty;
        }
        if let Some(side) = self.human_side {
            config.ai_human_side = side;
        }
        if let Some(start) = self.start {
            config.start_option = start;
        }

        let mut settings = config.settings();
        if let Some(grid_size) = self.grid_size {
            settings = settings.with_grid_size(grid_size)?;
        }
        if let Some(win_length) = self.win_length {
            settings = settings.with_win_length(win_length)?;
        }
        config.grid_size = settings.grid_size;
        config.win_length = settings.win_length;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logger(args.use_log_prefix.then(|| "Client".to_string()), args.quiet);

    let config_manager = get_config_manager(args.config.as_deref());
    let mut config = config_manager.get_config()?;
    args.apply_to(&mut config)?;
    config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("session seed {}", rng.seed());

    let session = MatchSession::new(config.match_options(), &mut rng)?;
    let options = RunnerOptions {
        thinking_delay: !args.no_delay,
    };
    runner::run(session, rng, config_manager, options).await
}
