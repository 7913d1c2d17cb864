//! Error types for the warpgrid core.
//!
//! Only conditions that make a result meaningless are errors. Anything
//! a run can recover from locally is a diagnostic instead, see
//! [`Diagnostics`](crate::Diagnostics).

use std::error::Error;
use std::fmt;

use crate::id::{Pos, StepId};

/// Errors from constructing or addressing a [`Grid`](crate::Grid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// A row's length differs from the first row's length.
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns.
        found: usize,
    },
    /// `rows * cols` does not fit in `usize`.
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
    /// A position lies outside the grid.
    OutOfBounds {
        /// The offending position.
        pos: Pos,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::TooLarge { rows, cols } => {
                write!(f, "grid of {rows}x{cols} cells is too large")
            }
            Self::OutOfBounds { pos, rows, cols } => {
                write!(f, "position {pos} is outside [0, {rows}) x [0, {cols})")
            }
        }
    }
}

impl Error for GridError {}

/// Fatal errors from executing a step.
///
/// A fatal error aborts the run; no partial grid accompanies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// A warp asked for a snapshot before the start of the run, or for a
    /// negative time delta.
    InvalidRollbackTarget {
        /// Step at which the warp fired.
        current: StepId,
        /// Requested time delta.
        dt: i64,
    },
    /// The run used up its transition budget (advances plus rollbacks)
    /// before reaching the requested time or halting.
    TransitionBudgetExhausted {
        /// Number of transitions executed.
        transitions: u64,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRollbackTarget { current, dt } => write!(
                f,
                "invalid rollback target: warp by dt={dt} at step {current} has no snapshot to rewrite"
            ),
            Self::TransitionBudgetExhausted { transitions } => {
                write!(f, "transition budget exhausted after {transitions} transitions")
            }
        }
    }
}

impl Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = StepError::InvalidRollbackTarget {
            current: StepId(2),
            dt: 5,
        };
        assert!(e.to_string().contains("dt=5"));
        assert!(e.to_string().contains("step 2"));

        let e = GridError::RaggedRow {
            row: 1,
            expected: 3,
            found: 2,
        };
        assert_eq!(e.to_string(), "row 1 has 2 cells, expected 3");
    }
}
