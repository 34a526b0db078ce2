use std::fmt::Write;

use nexus_engine::games::tictactoe::{GameMode, GameOutcome, MatchSession, PlayerSlot, Position, RoundState};

fn cell_width(round: &RoundState) -> usize {
    round
        .board()
        .positions()
        .filter_map(|pos| round.board().get(pos))
        .map(|mark| mark.as_str().chars().count())
        .max()
        .unwrap_or(1)
}

/// Text grid with 1-based headers. Cells of a winning line are wrapped in brackets.
pub fn render_board(round: &RoundState) -> String {
    let board = round.board();
    let width = cell_width(round);
    let winning = round.winning_cells();
    let mut out = String::new();

    let _ = write!(out, "   ");
    for col in 0..board.size() {
        let _ = write!(out, " {:^width$} ", col + 1, width = width);
    }
    out.push('\n');

    for row in 0..board.size() {
        let _ = write!(out, "{:>2} ", row + 1);
        for col in 0..board.size() {
            let pos = Position::new(row, col);
            let glyph = board.get(pos).map_or(".", |mark| mark.as_str());
            let (open, close) = if winning.contains(&pos) { ('[', ']') } else { (' ', ' ') };
            let _ = write!(out, "{}{:^width$}{}", open, glyph, close, width = width);
        }
        if row + 1 < board.size() {
            out.push('\n');
        }
    }
    out
}

pub fn render_status(session: &MatchSession) -> String {
    let round = session.round();
    match round.outcome() {
        GameOutcome::InProgress => {
            let player = session.player(session.current_slot());
            format!("{} ({}) to move", player.name, player.symbol)
        }
        GameOutcome::Win { mark, .. } => {
            let player = session.player(session.slot_of(mark));
            format!("{} ({}) wins! Type `new` to play again.", player.name, player.symbol)
        }
        GameOutcome::Draw => "It's a draw! Type `new` to play again.".to_string(),
    }
}

pub fn render_scores(session: &MatchSession) -> String {
    let mut out = String::new();
    let settings = session.settings();
    let _ = write!(
        out,
        "{}x{} board, {} in a row, {}",
        settings.grid_size,
        settings.grid_size,
        settings.win_length,
        session.mode()
    );
    if session.mode() == GameMode::Pvc {
        let _ = write!(out, " ({})", session.difficulty());
    }
    for slot in [PlayerSlot::Player1, PlayerSlot::Player2] {
        let player = session.player(slot);
        let _ = write!(
            out,
            "\n  {} ({}): {} won of {} played",
            player.name, player.symbol, player.score, player.games
        );
    }
    out
}
