//! The grid, its cells, and the gravity rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoardError, MoveError};

/// Number of rows. Row 0 is the bottom.
pub const ROWS: usize = 6;

/// Number of columns.
pub const COLS: usize = 7;

/// Pieces in a line needed to win.
pub const WIN_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Color / Cell
// ---------------------------------------------------------------------------

/// One of the two sides. Red always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
}

impl Color {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            Self::Red => Self::Yellow,
            Self::Yellow => Self::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "Red"),
            Self::Yellow => write!(f, "Yellow"),
        }
    }
}

/// The content of one grid position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum Cell {
    #[default]
    Empty,
    Red,
    Yellow,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The color occupying this cell, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Empty => None,
            Self::Red => Some(Color::Red),
            Self::Yellow => Some(Color::Yellow),
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Red => Self::Red,
            Color::Yellow => Self::Yellow,
        }
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A piece that was successfully dropped.
///
/// A `Move` returned by [`Board::drop_piece`] always names the row gravity
/// resolved the drop to. The fields are plain data, though: a `Move`
/// built by hand or decoded from the wire is not checked against any
/// board, so treat it as a report, never as input to replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub column: usize,
    pub row: usize,
    pub color: Color,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A 6-row × 7-column Connect Four grid.
///
/// Occupied cells in a column are always contiguous from row 0 upward.
/// The only mutation is [`drop_piece`](Self::drop_piece), which keeps
/// that invariant by construction. Deserialization checks it too: a
/// decoded grid with a piece floating above an empty cell is rejected
/// with [`BoardError::FloatingPiece`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardCells")]
pub struct Board {
    /// Indexed `[row][col]`, row 0 at the bottom.
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Returns the cell at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Signed variant of [`get`](Self::get) for walking outward from a
    /// cell without underflow checks at every call site.
    pub fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize)
    }

    /// Number of pieces in `col`, or `None` if the column doesn't exist.
    pub fn column_height(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        Some(
            (0..ROWS)
                .take_while(|&row| !self.cells[row][col].is_empty())
                .count(),
        )
    }

    /// Returns `true` if `col` exists and has no empty cell left.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.column_height(col) == Some(ROWS)
    }

    /// Columns that can still take a piece, left to right.
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLS).filter(|&col| !self.is_column_full(col))
    }

    /// Drops a `color` piece into `column` and returns where it landed.
    ///
    /// Scans the column bottom-up for the first empty cell.
    ///
    /// # Errors
    /// - [`MoveError::InvalidColumn`] if `column >= COLS`
    /// - [`MoveError::ColumnFull`] if the column has no empty cell
    ///
    /// The board is unchanged when an error is returned.
    pub fn drop_piece(
        &mut self,
        column: usize,
        color: Color,
    ) -> Result<Move, MoveError> {
        if column >= COLS {
            return Err(MoveError::InvalidColumn(column));
        }

        let row = (0..ROWS)
            .find(|&row| self.cells[row][column].is_empty())
            .ok_or(MoveError::ColumnFull(column))?;

        self.cells[row][column] = color.into();
        Ok(Move { column, row, color })
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Returns `true` when all 42 cells are occupied.
    pub fn is_full(&self) -> bool {
        self.occupied() == ROWS * COLS
    }

    /// Rows from the top of the board down, the order a display draws them.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[Cell; COLS]> {
        self.cells.iter().rev()
    }
}

/// Wire shape of a [`Board`], before the gravity check.
#[derive(Deserialize)]
struct BoardCells {
    cells: [[Cell; COLS]; ROWS],
}

impl TryFrom<BoardCells> for Board {
    type Error = BoardError;

    fn try_from(raw: BoardCells) -> Result<Self, Self::Error> {
        for column in 0..COLS {
            let height = (0..ROWS)
                .take_while(|&row| !raw.cells[row][column].is_empty())
                .count();
            if let Some(row) =
                (height..ROWS).find(|&row| !raw.cells[row][column].is_empty())
            {
                return Err(BoardError::FloatingPiece { row, column });
            }
        }
        Ok(Self { cells: raw.cells })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text grid, top row first, with column numbers underneath:
///
/// ```text
/// . . . . . . .
/// . . . Y . . .
/// . . R R . . .
/// 0 1 2 3 4 5 6
/// ```
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_top_down() {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Red => "R",
                    Cell::Yellow => "Y",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let footer: Vec<String> = (0..COLS).map(|c| c.to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}
