//! Unified error type for the Connect Four crates.

use connect_four_board::MoveError;
use connect_four_protocol::ProtocolError;
use connect_four_session::SessionError;

/// Top-level error wrapping every crate-specific error, so `?` works
/// across the board, protocol, and session layers in one function.
#[derive(Debug, thiserror::Error)]
pub enum ConnectFourError {
    /// A drop the board refused.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Encoding or decoding a boundary record failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session rejected an operation.
    #[error(transparent)]
    Session(#[from] SessionError),
}
