//! Connect Four sessions: the per-game state machine and the registry
//! that routes input to it.
//!
//! Each live game runs as an isolated Tokio task (actor model) that owns
//! its [`Session`] outright. Input for one game is processed strictly in
//! arrival order; different games never wait on each other.
//!
//! # Key types
//!
//! - [`Session`] — one game: board, seats, turn, status, move clock
//! - [`SessionManager`] — creates sessions and routes input to them
//! - [`SessionConfig`] — move timeout and channel sizing
//! - [`SessionError`] — every way an input can be rejected
//!
//! Outcomes (accepted moves, wins, ties, timeouts, forfeits) are pushed to
//! the [`OutcomeSender`] given to [`SessionManager::new`]; nothing waits
//! for the receiving side.

mod actor;
mod config;
mod error;
mod manager;
mod session;

pub use actor::{OutcomeReceiver, OutcomeSender};
pub use config::SessionConfig;
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Players, Session};
