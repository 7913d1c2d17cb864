//! Step engine and run loop for warpgrid programs.
//!
//! [`StepEngine`] plans one synchronous transition of a grid: moves,
//! arithmetic, comparisons and time warps, with first-writer-wins
//! conflict resolution. [`Simulation`] commits those transitions
//! against a [`History`] of snapshots, and [`run()`] wraps the whole
//! parse, substitute and step loop in one call.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod history;
pub mod metrics;
pub mod run;
pub mod simulation;
pub mod step;

pub use config::{ConfigError, RunConfig, DEFAULT_MAX_TRANSITIONS};
pub use history::History;
pub use metrics::{RunMetrics, StepMetrics};
pub use run::{run, RunError, RunReport, RunResult};
pub use simulation::{Simulation, StepEvent, StepResult};
pub use step::{StepEngine, StepOutcome, Transition, WarpEvent, Write};
