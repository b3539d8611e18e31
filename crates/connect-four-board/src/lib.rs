//! Board model and win detection for Connect Four.
//!
//! This is the leaf of the workspace. It knows nothing about players,
//! turns, or time — only about a 6×7 grid, the gravity rule that decides
//! where a dropped piece lands, and whether the piece just placed ended
//! the game.
//!
//! # Key types
//!
//! - [`Board`] — the grid, mutated only through [`Board::drop_piece`]
//! - [`Move`] — the record of one successful drop
//! - [`Axis`] — the four lines a four-in-a-row can lie on
//! - [`judge`] — the per-move verdict (win, tie, or keep playing)
//!
//! # Coordinates
//!
//! ```text
//! row 5  . . . . . . .   ← top
//! row 4  . . . . . . .
//! row 3  . . . . . . .
//! row 2  . . . . . . .
//! row 1  . . . Y . . .
//! row 0  . . R R . . .   ← bottom, pieces land here first
//!        0 1 2 3 4 5 6
//! ```

mod board;
mod error;
mod win;

pub use board::{Board, Cell, Color, Move, COLS, ROWS, WIN_LENGTH};
pub use error::{BoardError, MoveError};
pub use win::{judge, winning_axis, Axis, Verdict};
