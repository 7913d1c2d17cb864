//! One-shot entry point and run results.

use std::error::Error;
use std::fmt;

use warpgrid_core::{Diagnostics, Grid, Program, StepError};

use crate::config::{ConfigError, RunConfig};
use crate::metrics::RunMetrics;
use crate::simulation::Simulation;

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunResult {
    /// The requested time was reached; this is the grid at that time.
    Finished(Grid),
    /// A sink received this value.
    Halted(i64),
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished(grid) => write!(f, "{grid}"),
            Self::Halted(value) => write!(f, "{value}"),
        }
    }
}

/// Everything a completed run produced.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Final grid or halt value.
    pub result: RunResult,
    /// Structural diagnostics from parsing.
    pub structural: Diagnostics,
    /// Runtime diagnostics raised during this run.
    pub runtime: Diagnostics,
    /// Cumulative counters.
    pub metrics: RunMetrics,
}

/// Errors from [`run()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    /// The configuration was rejected before any step ran.
    Config(ConfigError),
    /// A step failed fatally.
    Step(StepError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Step(e) => write!(f, "step failed: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for RunError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

/// Parse `text`, substitute inputs and run it under `config`.
///
/// # Examples
///
/// ```
/// use warpgrid_engine::{run, RunConfig};
///
/// let report = run("1 > . > .", &RunConfig::new(0, 0, 3)).unwrap();
/// assert_eq!(report.result.to_string(), ". > . > 1");
/// ```
pub fn run(text: &str, config: &RunConfig) -> Result<RunReport, RunError> {
    let mut sim = Simulation::new(Program::parse(text), config.clone())?;
    Ok(sim.run()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_error_wraps_sources() {
        let e = RunError::from(ConfigError::ZeroSteps);
        assert_eq!(e.to_string(), "configuration error: steps must be at least 1");
        assert!(e.source().is_some());

        let e = RunError::from(StepError::TransitionBudgetExhausted { transitions: 5 });
        assert!(e.to_string().starts_with("step failed: "));
    }

    #[test]
    fn run_rejects_bad_config() {
        let err = run(".", &RunConfig::new(0, 0, 0)).unwrap_err();
        assert_eq!(err, RunError::Config(ConfigError::ZeroSteps));
    }

    #[test]
    fn single_step_request_returns_initial_grid() {
        let report = run("A > .", &RunConfig::new(4, 0, 1)).unwrap();
        assert_eq!(report.result.to_string(), "4 > .");
        assert_eq!(report.metrics.transitions, 0);
    }
}
