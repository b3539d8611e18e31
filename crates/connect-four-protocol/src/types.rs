//! Boundary record types.
//!
//! Everything here crosses the edge of the session core, so every type
//! derives `Serialize`/`Deserialize`. Enums use internally tagged JSON
//! (`{ "type": "Move", "column": 3 }`) so they read naturally in logs and
//! in whatever language sits on the other side.

use std::fmt;
use std::time::Duration;

use connect_four_board::{Axis, Board, Color, Move};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity as known to the messaging surface.
///
/// Newtype over `u64` so a `PlayerId` can never be passed where a
/// `SessionId` is expected. Serializes as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Opaque token addressing one game.
///
/// Issued by the session manager; callers only store it and hand it back
/// with each input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{:016x}", self.0)
    }
}

/// One seat at the table: who sits there and which color they play.
///
/// Matchmaking supplies exactly two of these (one per color) when it
/// creates a session. Slots never change afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub display_name: String,
    pub identity: PlayerId,
    pub color: Color,
}

impl PlayerSlot {
    pub fn new(
        display_name: impl Into<String>,
        identity: PlayerId,
        color: Color,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            identity,
            color,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// What a player asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    /// Drop a piece into `column` (0–6). Range checking happens on the
    /// board, not here, so an out-of-range column decodes fine and is
    /// rejected with a typed error later.
    Move { column: usize },

    /// Give up the game.
    Forfeit,
}

/// An [`InputEvent`] addressed to a session by an acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedInput {
    pub session_id: SessionId,
    pub actor: PlayerId,
    pub event: InputEvent,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Where a game stands.
///
/// ```text
/// AwaitingMove(Red) ⇄ AwaitingMove(Yellow)
///        │
///        ├──→ Won       ┐
///        ├──→ Tied      │ terminal: nothing
///        ├──→ TimedOut  │ changes after this
///        └──→ Forfeited ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameStatus {
    /// Waiting for `turn` to drop a piece.
    AwaitingMove { turn: Color },

    /// `winner` connected four along `axis`.
    Won {
        winner: Color,
        loser: Color,
        axis: Axis,
    },

    /// The board filled up without a winner.
    Tied,

    /// `loser` didn't move before the deadline.
    TimedOut { loser: Color },

    /// `forfeiter` gave up.
    Forfeited { forfeiter: Color },
}

impl GameStatus {
    /// Returns `true` for every status except `AwaitingMove`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::AwaitingMove { .. })
    }

    /// Whose move it is, or `None` once the game is over.
    pub fn turn(&self) -> Option<Color> {
        match self {
            Self::AwaitingMove { turn } => Some(*turn),
            _ => None,
        }
    }

    /// The side that won: the connector of four, or the opponent of the
    /// player who timed out or forfeited. `None` while playing or on a tie.
    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Won { winner, .. } => Some(*winner),
            Self::TimedOut { loser } => Some(loser.other()),
            Self::Forfeited { forfeiter } => Some(forfeiter.other()),
            Self::AwaitingMove { .. } | Self::Tied => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingMove { turn } => write!(f, "{turn} to move"),
            Self::Won { winner, axis, .. } => {
                write!(f, "{winner} wins ({axis:?})")
            }
            Self::Tied => write!(f, "tie"),
            Self::TimedOut { loser } => write!(f, "{loser} timed out"),
            Self::Forfeited { forfeiter } => write!(f, "{forfeiter} forfeited"),
        }
    }
}

/// Emitted after every accepted move, forfeit, or timeout.
///
/// Carries a full board snapshot so a renderer never needs to track state
/// of its own. Decoding checks the board's gravity but nothing else: a
/// decoded outcome is a report to render, not state to resume a game from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub session_id: SessionId,
    pub board: Board,
    pub status: GameStatus,
    /// The move that produced this outcome. `None` for forfeits, timeouts,
    /// and snapshots of a game with no moves yet.
    pub last_move: Option<Move>,
    /// Time left on the current player's clock. `None` once terminal.
    pub time_to_move: Option<Duration>,
}
