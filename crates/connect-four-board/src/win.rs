//! Win and tie detection, seeded by the piece that was just placed.
//!
//! Detection runs in three passes over the neighborhood of the new piece:
//!
//! 1. **Adjacency scan** — look at the 8 surrounding cells and keep the
//!    ones holding the same color.
//! 2. **Axis classification** — map each matching neighbor's offset onto
//!    one of four [`Axis`] values. Both neighbors on one axis collapse to
//!    a single entry.
//! 3. **Run length** — for each classified axis, walk outward in both
//!    directions and count the unbroken run through the new piece.
//!
//! Only axes with at least one matching neighbor are walked; a run of four
//! through the new piece always has one.

use serde::{Deserialize, Serialize};

use crate::{Board, Cell, Move, WIN_LENGTH};

/// Offsets `(Δrow, Δcol)` of the 8 neighbors, scanned in this order.
const NEIGHBORS: [(isize, isize); 8] = [
    (1, 0),   // N
    (-1, 0),  // S
    (0, 1),   // E
    (0, -1),  // W
    (1, 1),   // NE
    (-1, -1), // SW
    (-1, 1),  // SE
    (1, -1),  // NW
];

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// A line through the board along which four-in-a-row can form.
///
/// With row 0 at the bottom, "backslash" runs from upper-left to
/// lower-right and "slash" from lower-left to upper-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
    Backslash,
    Slash,
}

impl Axis {
    pub const ALL: [Axis; 4] =
        [Self::Horizontal, Self::Vertical, Self::Backslash, Self::Slash];

    fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
            Self::Backslash => 2,
            Self::Slash => 3,
        }
    }

    /// One step `(Δrow, Δcol)` along the axis. The opposite direction is
    /// the negated step.
    pub fn step(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
            Self::Backslash => (-1, 1),
            Self::Slash => (1, 1),
        }
    }

    /// Maps a neighbor offset onto its axis. Returns `None` for `(0, 0)`
    /// and anything that isn't a unit step.
    pub fn classify(d_row: isize, d_col: isize) -> Option<Self> {
        match (d_row, d_col) {
            (0, -1 | 1) => Some(Self::Horizontal),
            (-1 | 1, 0) => Some(Self::Vertical),
            (-1, 1) | (1, -1) => Some(Self::Backslash),
            (1, 1) | (-1, -1) => Some(Self::Slash),
            _ => None,
        }
    }
}

/// Fixed-size set of axes, populated once per move and thrown away.
#[derive(Debug, Clone, Copy, Default)]
struct AxisSet([bool; 4]);

impl AxisSet {
    fn insert(&mut self, axis: Axis) {
        self.0[axis.index()] = true;
    }

    fn iter(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |a| self.0[a.index()])
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// What a move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The move completed four-in-a-row along `Axis`.
    Win(Axis),
    /// No win and the board is now full.
    Tie,
    /// Neither; the other side moves next.
    Continue,
}

/// Judges the move that was just placed. A win is checked before a tie,
/// so filling the last cell with a winning piece is a [`Verdict::Win`].
pub fn judge(board: &Board, placed: &Move) -> Verdict {
    if let Some(axis) = winning_axis(board, placed) {
        Verdict::Win(axis)
    } else if board.is_full() {
        Verdict::Tie
    } else {
        Verdict::Continue
    }
}

/// Returns the first axis (in [`Axis::ALL`] order) on which `placed`
/// completes a run of [`WIN_LENGTH`].
pub fn winning_axis(board: &Board, placed: &Move) -> Option<Axis> {
    candidate_axes(board, placed)
        .iter()
        .find(|&axis| run_length(board, placed, axis) == WIN_LENGTH)
}

/// Passes 1 and 2: matching neighbors, deduplicated by axis.
fn candidate_axes(board: &Board, placed: &Move) -> AxisSet {
    let target = Cell::from(placed.color);
    let (row, col) = (placed.row as isize, placed.column as isize);

    let mut axes = AxisSet::default();
    for (d_row, d_col) in NEIGHBORS {
        if board.cell_at(row + d_row, col + d_col) != Some(target) {
            continue;
        }
        if let Some(axis) = Axis::classify(d_row, d_col) {
            axes.insert(axis);
        }
    }
    axes
}

/// Pass 3: length of the run through `placed` along `axis`, capped at
/// [`WIN_LENGTH`].
///
/// Steps 1..WIN_LENGTH out on each side are taken alternately. A side
/// counts a step only while every cell before it on that side matched, so
/// a gap closes the side for good.
fn run_length(board: &Board, placed: &Move, axis: Axis) -> usize {
    let target = Cell::from(placed.color);
    let (d_row, d_col) = axis.step();
    let (row, col) = (placed.row as isize, placed.column as isize);

    let mut count = 1;
    let mut open = [true, true];
    for i in 1..WIN_LENGTH as isize {
        for (side, sign) in [(0, -1), (1, 1)] {
            if count == WIN_LENGTH {
                return count;
            }
            if !open[side] {
                continue;
            }
            let cell = board.cell_at(row + sign * i * d_row, col + sign * i * d_col);
            if cell == Some(target) {
                count += 1;
            } else {
                open[side] = false;
            }
        }
    }
    count
}
