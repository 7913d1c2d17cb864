//! Text validator: tokenizes a serialized program into a typed [`Grid`].
//!
//! Validation never fails. Every defect becomes a structural diagnostic
//! and the grid is still built: illegal tokens turn into `Empty`,
//! out-of-range literals are kept as written, short rows are padded.
//! Whether to refuse execution is the caller's decision.

use crate::cell::Cell;
use crate::diagnostic::Diagnostics;
use crate::grid::Grid;
use crate::id::Pos;

/// Smallest numeric literal allowed in an initial grid.
pub const LITERAL_MIN: i64 = -99;
/// Largest numeric literal allowed in an initial grid.
pub const LITERAL_MAX: i64 = 99;

/// A parsed program: the typed grid plus its structural diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    /// The typed grid, inputs not yet substituted.
    pub grid: Grid,
    /// Structural diagnostics found while parsing.
    pub diagnostics: Diagnostics,
}

impl Program {
    /// Parse a textual grid.
    ///
    /// Rows are separated by line breaks and cells by whitespace.
    /// Leading and trailing blank lines are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpgrid_core::{Cell, DiagnosticKey, Pos, Program};
    ///
    /// let program = Program::parse(". 3 .\n5 + x\n");
    /// assert_eq!(program.grid.get(Pos::new(1, 0)), Some(&Cell::Number(5)));
    /// assert_eq!(program.grid.get(Pos::new(1, 2)), Some(&Cell::Empty));
    /// assert!(program
    ///     .diagnostics
    ///     .contains(&DiagnosticKey::IllegalToken(Pos::new(1, 2))));
    /// ```
    pub fn parse(text: &str) -> Self {
        let tokens: Vec<Vec<&str>> = text
            .trim()
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        let cols = tokens.iter().map(Vec::len).max().unwrap_or(0);

        let mut diagnostics = Diagnostics::new();
        let mut rows = Vec::with_capacity(tokens.len());
        for (r, line) in tokens.iter().enumerate() {
            let mut row = Vec::with_capacity(cols);
            for (c, token) in line.iter().enumerate() {
                let pos = Pos::new(r, c);
                let cell = match Cell::from_token(token) {
                    Some(cell) => cell,
                    None => {
                        diagnostics.illegal_token(pos, token);
                        Cell::Empty
                    }
                };
                row.push(cell);
            }
            if line.len() < cols {
                diagnostics.ragged_row(r, line.len(), cols);
                row.resize(cols, Cell::Empty);
            }
            rows.push(row);
        }

        // Padding above guarantees a rectangle, so this cannot fail.
        let grid = Grid::from_rows(rows).unwrap_or_default();
        diagnostics.extend(check_literals(&grid));
        Self { grid, diagnostics }
    }
}

/// Report every `Number` cell outside `[LITERAL_MIN, LITERAL_MAX]`.
///
/// Values are not clamped.
pub fn check_literals(grid: &Grid) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for (pos, cell) in grid.iter() {
        if let Some(v) = cell.as_number() {
            if !(LITERAL_MIN..=LITERAL_MAX).contains(&v) {
                diagnostics.literal_out_of_range(pos, v, LITERAL_MIN, LITERAL_MAX);
            }
        }
    }
    diagnostics
}

/// Structural diagnostics for a textual grid.
pub fn validate(text: &str) -> Diagnostics {
    Program::parse(text).diagnostics
}
