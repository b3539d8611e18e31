//! Error types for board mutations and decoding.

/// Why a drop was rejected. The board is untouched in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The column index is outside `0..COLS`.
    #[error("column {0} is out of range (0-6)")]
    InvalidColumn(usize),

    /// Every cell in the column is already occupied.
    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Why a decoded grid isn't a reachable board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A piece sits above an empty cell in its column.
    #[error("floating piece at row {row}, column {column}")]
    FloatingPiece { row: usize, column: usize },
}
