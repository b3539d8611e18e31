//! Error types for the session layer.

use connect_four_board::MoveError;
use connect_four_protocol::{PlayerId, SessionId};

/// Every way a session operation can be rejected.
///
/// All of these are expected, recoverable conditions scoped to the one
/// offending call. The session (and every other session) is left exactly
/// as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The column is outside 0–6.
    #[error("column {0} is out of range (0-6)")]
    InvalidColumn(usize),

    /// The column has no empty cell. The same player should pick again.
    #[error("column {0} is full")]
    ColumnFull(usize),

    /// The player holds a seat but it's the other color's move.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The player holds no seat in this session.
    #[error("{0} is not playing in this session")]
    NotAPlayer(PlayerId),

    /// The session already ended. Nothing was changed.
    #[error("session {0} is already over")]
    SessionTerminal(SessionId),

    /// No live session has this id: it ended earlier or never existed.
    /// Input racing a game's end lands here; callers should just drop it.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// Session creation needs exactly one Red and one Yellow seat held by
    /// two different players.
    #[error("invalid players: {0}")]
    InvalidPlayers(String),
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::InvalidColumn(col) => Self::InvalidColumn(col),
            MoveError::ColumnFull(col) => Self::ColumnFull(col),
        }
    }
}
