//! Core types for the warpgrid language.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the typed cell model, the [`Grid`] container, positions and step IDs,
//! the diagnostics registry, error types, and the text validator that
//! turns a serialized program into a typed grid.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod diagnostic;
pub mod error;
pub mod grid;
pub mod id;
pub mod validate;

pub use cell::{BinaryOp, Cell, Direction, DivisionRounding};
pub use diagnostic::{DiagnosticKey, Diagnostics};
pub use error::{GridError, StepError};
pub use grid::Grid;
pub use id::{Pos, StepId};
pub use validate::{check_literals, validate, Program, LITERAL_MAX, LITERAL_MIN};
