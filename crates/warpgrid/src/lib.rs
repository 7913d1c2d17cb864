//! Warpgrid: an interpreter for a two-dimensional dataflow language with
//! time travel.
//!
//! A program is a rectangular grid of cells: numbers, movers, binary
//! operators, warps that rewrite the simulation's own past, and sinks
//! whose first received value is the program's answer. This facade
//! re-exports the public API of the sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use warpgrid::prelude::*;
//!
//! // `A + B`, written into the sink on the first step.
//! let program = ". A .\nB + S\n. . .";
//! let report = run(program, &RunConfig::new(3, 5, 10)).unwrap();
//! assert_eq!(report.result, RunResult::Halted(8));
//!
//! // Without a sink the run stops at the requested time.
//! let report = run("1 > . .", &RunConfig::new(0, 0, 2)).unwrap();
//! assert_eq!(report.result.to_string(), ". > 1 .");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `warpgrid-core` | Cells, grids, positions, diagnostics, validation |
//! | [`engine`] | `warpgrid-engine` | Step engine, history, simulation driver, `run` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and validation (`warpgrid-core`).
///
/// Contains the [`types::Cell`] model, the [`types::Grid`] container,
/// [`types::Program::parse`] and the [`types::Diagnostics`] registry.
pub use warpgrid_core as types;

/// Step engine and run loop (`warpgrid-engine`).
///
/// [`engine::StepEngine`] plans single transitions,
/// [`engine::Simulation`] commits them, and [`engine::run`] does both
/// from program text.
pub use warpgrid_engine as engine;

/// Common imports for typical warpgrid usage.
///
/// ```rust
/// use warpgrid::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use warpgrid_core::{
        Cell, DiagnosticKey, Diagnostics, DivisionRounding, Grid, Pos, Program, StepId,
    };

    // Errors
    pub use warpgrid_core::{GridError, StepError};
    pub use warpgrid_engine::{ConfigError, RunError};

    // Engine
    pub use warpgrid_engine::{
        run, RunConfig, RunReport, RunResult, Simulation, StepEvent, StepMetrics, StepOutcome,
    };
}
