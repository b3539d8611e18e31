//! Boundary records for Connect Four sessions.
//!
//! The session core talks to three outside parties: whoever pairs players
//! (matchmaking), whoever delivers their input (a chat bot, a socket, a
//! terminal), and whoever renders results. This crate is the vocabulary
//! they share:
//!
//! - **Identity** ([`PlayerId`], [`SessionId`], [`PlayerSlot`]) — who is
//!   playing and which game an event targets.
//! - **Input** ([`InputEvent`], [`RoutedInput`]) — a column choice or a
//!   forfeit, tagged with the acting player.
//! - **Output** ([`Outcome`], [`GameStatus`]) — the board and status after
//!   every accepted input or timeout.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — turning any of the above
//!   into bytes and back.
//!
//! ```text
//! matchmaking ──PlayerSlot──→ ┌──────────────┐
//! input ───────RoutedInput──→ │ session core │ ──Outcome──→ renderer
//!                             └──────────────┘
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    GameStatus, InputEvent, Outcome, PlayerId, PlayerSlot, RoutedInput,
    SessionId,
};
