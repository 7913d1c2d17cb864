//! Strongly-typed positions and step counters.

use std::fmt;

/// A `(row, col)` position inside a grid.
///
/// Positions order row-major, which is also the discovery order the
/// step engine uses for tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl Pos {
    /// Construct a position from a row and a column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset this position by a signed delta.
    ///
    /// Returns `None` when either component would go negative or overflow.
    /// Upper bounds are the grid's business, see
    /// [`Grid::offset`](crate::Grid::offset).
    pub fn checked_offset(self, d_row: i64, d_col: i64) -> Option<Self> {
        let row = i64::try_from(self.row).ok()?.checked_add(d_row)?;
        let col = i64::try_from(self.col).ok()?.checked_add(d_col)?;
        Some(Self {
            row: usize::try_from(row).ok()?,
            col: usize::try_from(col).ok()?,
        })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Number of completed steps since the run started.
///
/// `StepId(0)` is the post-substitution initial grid. Advancing moves
/// the counter forward by one; a time warp moves it back by `dt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StepId(pub u64);

impl StepId {
    /// The 1-based time shown to users: the initial grid is time 1.
    pub fn time(self) -> u64 {
        self.0 + 1
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
