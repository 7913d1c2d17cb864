//! Test fixtures and helpers for warpgrid development.
//!
//! [`grid()`] parses a program that is expected to be clean;
//! [`fixtures`] holds canned programs shared by the engine's unit and
//! integration tests and the benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use warpgrid_core::{Cell, Grid, Program};

/// Parse `text` into a grid, panicking on any structural diagnostic.
///
/// Inputs are left unsubstituted.
pub fn grid(text: &str) -> Grid {
    let program = Program::parse(text);
    assert!(
        program.diagnostics.is_empty(),
        "fixture has structural diagnostics:\n{}",
        program.diagnostics
    );
    program.grid
}

/// A `rows` x `cols` grid filled with `Empty`.
pub fn empty_grid(rows: usize, cols: usize) -> Grid {
    Grid::new(rows, cols).unwrap()
}

/// A grid of numbers only, from a row-major value table.
pub fn number_grid(values: &[Vec<i64>]) -> Grid {
    Grid::from_rows(
        values
            .iter()
            .map(|row| row.iter().copied().map(Cell::Number).collect())
            .collect(),
    )
    .unwrap()
}
