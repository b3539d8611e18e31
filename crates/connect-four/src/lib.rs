//! # Connect Four
//!
//! Concurrent, timed Connect Four sessions.
//!
//! Matchmaking hands the [`SessionManager`] two seats; it starts an isolated
//! game with a running move clock and returns a [`SessionId`]. Input events
//! for that id are routed to the game one at a time. Every accepted move,
//! win, tie, timeout, or forfeit is pushed to an outcome channel for
//! rendering, and finished games drop out of the registry on their own.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use connect_four::prelude::*;
//!
//! # async fn run() -> Result<(), ConnectFourError> {
//! let (tx, mut outcomes) = tokio::sync::mpsc::unbounded_channel();
//! let manager = SessionManager::new(SessionConfig::default(), tx);
//!
//! let id = manager
//!     .create(vec![
//!         PlayerSlot::new("alice", PlayerId(1), Color::Red),
//!         PlayerSlot::new("bob", PlayerId(2), Color::Yellow),
//!     ])
//!     .await?;
//!
//! manager.route(id, PlayerId(1), InputEvent::Move { column: 3 }).await?;
//!
//! while let Some(outcome) = outcomes.recv().await {
//!     println!("{}\n{}", outcome.status, outcome.board);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | crate | holds |
//! |---|---|
//! | `connect-four-board` | grid, gravity, win detection |
//! | `connect-four-protocol` | ids, input events, outcome records, codec |
//! | `connect-four-clock` | the per-session move deadline |
//! | `connect-four-session` | state machine, actors, manager |

mod error;

pub use connect_four_board as board;
pub use connect_four_clock as clock;
pub use connect_four_protocol as protocol;
pub use connect_four_session as session;

pub use error::ConnectFourError;

/// Everything a matchmaker, input adapter, or renderer usually needs.
pub mod prelude {
    pub use connect_four_board::{
        Axis, Board, BoardError, Cell, Color, Move, MoveError, COLS, ROWS,
        WIN_LENGTH,
    };
    pub use connect_four_clock::DEFAULT_MOVE_TIMEOUT;
    pub use connect_four_protocol::{
        Codec, GameStatus, InputEvent, JsonCodec, Outcome, PlayerId,
        PlayerSlot, ProtocolError, RoutedInput, SessionId,
    };
    pub use connect_four_session::{
        OutcomeReceiver, OutcomeSender, SessionConfig, SessionError,
        SessionManager,
    };

    pub use crate::ConnectFourError;
}

pub use prelude::*;
