//! Two players, one keyboard.
//!
//! Runs a single session through the full manager/actor stack: every line
//! typed is routed as the current player's input, and the board is redrawn
//! from the outcome channel. Pass a number of seconds as the first argument
//! to change the move timeout (default 60).
//!
//! ```text
//! cargo run -p terminal-duel -- 20
//! RUST_LOG=connect_four_session=debug cargo run -p terminal-duel
//! ```

use std::io::Write as _;
use std::time::Duration;

use connect_four::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const BORDER: &str = "🟦";
const EMPTY: &str = "⚪";
const RED: &str = "🔴";
const YELLOW: &str = "🟡";

const RED_PLAYER: PlayerId = PlayerId(1);
const YELLOW_PLAYER: PlayerId = PlayerId(2);

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Column(usize),
    Forfeit,
}

/// `exit` forfeits; any non-negative number is a column (range checking is
/// the session's job). Anything else is `None`.
fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") {
        return Some(Command::Forfeit);
    }
    line.parse().ok().map(Command::Column)
}

fn parse_timeout(arg: Option<String>) -> Result<Duration, String> {
    match arg {
        None => Ok(DEFAULT_MOVE_TIMEOUT),
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(format!("move timeout must be a positive number of seconds, got {raw:?}")),
        },
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn symbol(cell: Cell) -> &'static str {
    match cell {
        Cell::Empty => EMPTY,
        Cell::Red => RED,
        Cell::Yellow => YELLOW,
    }
}

fn render_board(board: &Board) -> String {
    let mut out = BORDER.repeat(COLS + 2);
    out.push('\n');
    for row in board.rows_top_down() {
        out.push_str(BORDER);
        for cell in row {
            out.push_str(symbol(*cell));
        }
        out.push_str(BORDER);
        out.push('\n');
    }
    // Emoji are two columns wide, so " n" lines up under each cell.
    out.push_str(BORDER);
    for col in 0..COLS {
        out.push_str(&format!(" {col}"));
    }
    out.push_str(BORDER);
    out
}

fn render_result(status: &GameStatus) -> Option<String> {
    let text = match status {
        GameStatus::AwaitingMove { .. } => return None,
        GameStatus::Tied => "It's a tie!".to_string(),
        GameStatus::Forfeited { forfeiter } => {
            format!("{forfeiter} forfeited. {} Wins!", forfeiter.other())
        }
        GameStatus::TimedOut { loser } => {
            format!("{loser} ran out of time. {} Wins!", loser.other())
        }
        GameStatus::Won { winner, .. } => {
            let line = "#".repeat(9);
            format!("{line}\n{winner} Wins!\n{line}")
        }
    };
    Some(text)
}

fn prompt(turn: Color, time_to_move: Option<Duration>) -> String {
    let clock = time_to_move
        .map(|left| format!(" ({}s left)", left.as_secs()))
        .unwrap_or_default();
    format!("{turn} Turn{clock}\nEnter column or 'exit' to forfeit: ")
}

fn player_for(color: Color) -> PlayerId {
    match color {
        Color::Red => RED_PLAYER,
        Color::Yellow => YELLOW_PLAYER,
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("terminal_duel=info".parse()?))
        .init();

    let move_timeout = parse_timeout(std::env::args().nth(1))?;
    let (tx, mut outcomes) = mpsc::unbounded_channel();
    let manager = SessionManager::new(SessionConfig::with_move_timeout(move_timeout), tx);

    let session_id = manager
        .create(vec![
            PlayerSlot::new("Red", RED_PLAYER, Color::Red),
            PlayerSlot::new("Yellow", YELLOW_PLAYER, Color::Yellow),
        ])
        .await?;
    tracing::info!(%session_id, timeout_secs = move_timeout.as_secs(), "duel started");

    println!("WELCOME TO CONNECT 4");
    println!("{}", render_board(&manager.snapshot(session_id).await?.board));

    // Redraws on every outcome; finishes with the game.
    let mut renderer = tokio::spawn(async move {
        while let Some(outcome) = outcomes.recv().await {
            if let Some(mv) = outcome.last_move {
                println!("{} dropped into column {}", mv.color, mv.column);
            }
            println!("{}", render_board(&outcome.board));
            if let Some(result) = render_result(&outcome.status) {
                println!("{result}");
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Ok(snapshot) = manager.snapshot(session_id).await else {
            break;
        };
        let Some(turn) = snapshot.status.turn() else {
            break;
        };
        print!("{}", prompt(turn, snapshot.time_to_move));
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            // Timed out while waiting. Tokio's stdin thread may still hold
            // the runtime open until the next newline.
            _ = &mut renderer => return Ok(()),
        };
        let command = match line.as_deref().map(parse_command) {
            // End of input counts as giving up.
            None => Command::Forfeit,
            Some(Some(command)) => command,
            Some(None) => {
                println!("Invalid input.");
                continue;
            }
        };

        let event = match command {
            Command::Column(column) => InputEvent::Move { column },
            Command::Forfeit => InputEvent::Forfeit,
        };
        match manager.route(session_id, player_for(turn), event).await {
            Ok(_) => {}
            Err(SessionError::ColumnFull(_)) => println!("Column full."),
            Err(SessionError::InvalidColumn(_)) => println!("Invalid input."),
            Err(SessionError::SessionNotFound(_) | SessionError::SessionTerminal(_)) => break,
            Err(err) => println!("{err}"),
        }
    }

    renderer.await?;
    Ok(())
}
