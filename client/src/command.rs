use nexus_engine::games::tictactoe::{Difficulty, GameMode, PlayerSlot, Position, StartOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Place(Position),
    NewGame,
    Scores,
    ResetScores,
    SetDifficulty(Difficulty),
    SetSize {
        grid_size: usize,
        win_length: Option<usize>,
    },
    SetMode(GameMode),
    SetStart(StartOption),
    SetHumanSide(PlayerSlot),
    Rename {
        slot: PlayerSlot,
        name: String,
    },
    SetSymbol {
        slot: PlayerSlot,
        symbol: String,
    },
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  <row> <col>              place your mark (1-based, e.g. `2 3`)
  new                      start a new round
  scores                   show the score table
  reset                    reset scores to zero
  difficulty <level>       easy, medium or hard
  size <n> [k]             grid size 3..8 and optional win length
  mode <pvp|pvc>           two players or play against the computer
  start <option>           player1, player2, alternate or random
  side <1|2>               which player you control against the computer
  name <1|2> <text>        rename a player
  symbol <1|2> <glyph>     change a player's symbol
  help                     show this help
  quit                     leave the game";

fn parse_number(token: &str, what: &str) -> Result<usize, String> {
    token
        .parse::<usize>()
        .map_err(|_| format!("{} must be a number, got `{}`", what, token))
}

fn parse_cell(row: &str, col: &str) -> Result<Command, String> {
    let row = parse_number(row, "row")?;
    let col = parse_number(col, "column")?;
    if row == 0 || col == 0 {
        return Err("rows and columns are numbered from 1".to_string());
    }
    Ok(Command::Place(Position::new(row - 1, col - 1)))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Err("empty command, type `help` for the list".to_string());
    };

    match (head.to_ascii_lowercase().as_str(), args) {
        ("new" | "n", []) => Ok(Command::NewGame),
        ("scores" | "score", []) => Ok(Command::Scores),
        ("reset", []) => Ok(Command::ResetScores),
        ("help" | "h" | "?", []) => Ok(Command::Help),
        ("quit" | "exit" | "q", []) => Ok(Command::Quit),
        ("difficulty" | "d", [level]) => level
            .parse()
            .map(Command::SetDifficulty)
            .map_err(|e| format!("{}", e)),
        ("mode" | "m", [mode]) => mode.parse().map(Command::SetMode).map_err(|e| format!("{}", e)),
        ("start", [option]) => option.parse().map(Command::SetStart).map_err(|e| format!("{}", e)),
        ("side", [slot]) => slot.parse().map(Command::SetHumanSide).map_err(|e| format!("{}", e)),
        ("name", [slot, name @ ..]) if !name.is_empty() => Ok(Command::Rename {
            slot: slot.parse::<PlayerSlot>().map_err(|e| format!("{}", e))?,
            name: name.join(" "),
        }),
        ("symbol", [slot, symbol]) => Ok(Command::SetSymbol {
            slot: slot.parse::<PlayerSlot>().map_err(|e| format!("{}", e))?,
            symbol: symbol.to_string(),
        }),
        ("size" | "s", [grid_size]) => Ok(Command::SetSize {
            grid_size: parse_number(grid_size, "grid size")?,
            win_length: None,
        }),
        ("size" | "s", [grid_size, win_length]) => Ok(Command::SetSize {
            grid_size: parse_number(grid_size, "grid size")?,
            win_length: Some(parse_number(win_length, "win length")?),
        }),
        (_, [col]) if head.chars().all(|c| c.is_ascii_digit()) => parse_cell(head, col),
        _ => Err(format!("unknown command `{}`, type `help` for the list", line.trim())),
    }
}
