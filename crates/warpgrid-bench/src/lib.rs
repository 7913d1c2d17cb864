//! Reference workloads for benchmarking warpgrid.
//!
//! - [`adder_lattice`]: tiles of `+` cells that all fire on the first step
//! - [`mover_field`]: rows of mover chains that keep moving for many steps
//! - [`program`]: wraps a generated grid as a clean [`Program`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use warpgrid_core::{BinaryOp, Cell, Diagnostics, Direction, Grid, GridError, Program};

/// `blocks` x `blocks` tiles of the 3x3 adder `. U . / L + . / . . .`.
///
/// Operand values vary per tile so results differ across the grid.
pub fn adder_lattice(blocks: usize) -> Result<Grid, GridError> {
    let side = blocks * 3;
    let mut grid = Grid::new(side, side)?;
    for br in 0..blocks {
        for bc in 0..blocks {
            let (r, c) = (br * 3, bc * 3);
            let seed = ((br * 31 + bc * 17) % 99) as i64;
            grid.set((r, c + 1).into(), Cell::Number(seed))?;
            grid.set((r + 1, c).into(), Cell::Number(99 - seed))?;
            grid.set((r + 1, c + 1).into(), Cell::BinaryOp(BinaryOp::Add))?;
        }
    }
    Ok(grid)
}

/// `rows` rows of `n > . > . > ...`, `cols` cells wide.
///
/// Each row carries one number rightwards by one cell per step until it
/// reaches the edge, roughly `cols / 2` steps.
pub fn mover_field(rows: usize, cols: usize) -> Result<Grid, GridError> {
    let mut grid = Grid::new(rows, cols)?;
    for r in 0..rows {
        if cols == 0 {
            break;
        }
        grid.set((r, 0).into(), Cell::Number((r % 99) as i64))?;
        for c in (1..cols).step_by(2) {
            grid.set((r, c).into(), Cell::Mover(Direction::Right))?;
        }
    }
    Ok(grid)
}

/// A program with no structural diagnostics around `grid`.
pub fn program(grid: Grid) -> Program {
    Program {
        grid,
        diagnostics: Diagnostics::new(),
    }
}
