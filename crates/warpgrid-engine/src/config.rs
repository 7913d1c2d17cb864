//! Run configuration, validation, and error types.
//!
//! [`RunConfig`] is the builder-input for constructing a
//! [`Simulation`](crate::simulation::Simulation).
//! [`validate()`](RunConfig::validate) checks every invariant up front so
//! the step loop never has to.

use std::error::Error;
use std::fmt;

use warpgrid_core::{DivisionRounding, LITERAL_MAX, LITERAL_MIN};

/// Default cap on total transitions (advances plus rollbacks) per run.
pub const DEFAULT_MAX_TRANSITIONS: u64 = 1_000_000;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RunConfig::validate()`] or simulation setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Input parameter `A` or `B` lies outside `[-99, 99]`.
    ParameterOutOfRange {
        /// `'A'` or `'B'`.
        name: char,
        /// The rejected value.
        value: i64,
    },
    /// `steps` is zero; time starts at 1.
    ZeroSteps,
    /// `max_transitions` is zero.
    ZeroTransitionBudget,
    /// Strict mode refused a program with structural diagnostics.
    StructuralDiagnostics {
        /// Number of structural diagnostics found.
        count: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterOutOfRange { name, value } => write!(
                f,
                "parameter {name}={value} must be from {LITERAL_MIN} to {LITERAL_MAX}"
            ),
            Self::ZeroSteps => write!(f, "steps must be at least 1"),
            Self::ZeroTransitionBudget => write!(f, "max_transitions must be at least 1"),
            Self::StructuralDiagnostics { count } => {
                write!(f, "strict mode: program has {count} structural diagnostics")
            }
        }
    }
}

impl Error for ConfigError {}

// ── RunConfig ──────────────────────────────────────────────────────

/// Complete configuration for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Value substituted for every `A` cell. Must be in `[-99, 99]`.
    pub a: i64,
    /// Value substituted for every `B` cell. Must be in `[-99, 99]`.
    pub b: i64,
    /// Requested time. The initial grid is time 1, so `steps = n` runs
    /// at most `n - 1` forward transitions. Must be at least 1.
    pub steps: u64,
    /// Hard cap on transitions including rollbacks, so a warp loop
    /// cannot run forever. Default: [`DEFAULT_MAX_TRANSITIONS`].
    pub max_transitions: u64,
    /// Rounding used by `/` and `%`. Default: [`DivisionRounding::Floor`].
    pub rounding: DivisionRounding,
    /// Refuse to build a simulation when the program has structural
    /// diagnostics. Default: `false` (diagnostics are advisory).
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            a: 0,
            b: 0,
            steps: 1,
            max_transitions: DEFAULT_MAX_TRANSITIONS,
            rounding: DivisionRounding::default(),
            strict: false,
        }
    }
}

impl RunConfig {
    /// Configuration with the given inputs and requested time; everything
    /// else defaulted.
    pub fn new(a: i64, b: i64, steps: u64) -> Self {
        Self {
            a,
            b,
            steps,
            ..Self::default()
        }
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Parameters within the literal range.
        for (name, value) in [('A', self.a), ('B', self.b)] {
            if !(LITERAL_MIN..=LITERAL_MAX).contains(&value) {
                return Err(ConfigError::ParameterOutOfRange { name, value });
            }
        }
        // 2. Time starts at 1.
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        // 3. A zero budget could never execute anything.
        if self.max_transitions == 0 {
            return Err(ConfigError::ZeroTransitionBudget);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
        let c = RunConfig::new(-99, 99, 10);
        assert!(c.validate().is_ok());
        assert_eq!(c.max_transitions, DEFAULT_MAX_TRANSITIONS);
        assert_eq!(c.rounding, DivisionRounding::Floor);
        assert!(!c.strict);
    }

    #[test]
    fn parameters_out_of_range() {
        assert_eq!(
            RunConfig::new(100, 0, 1).validate(),
            Err(ConfigError::ParameterOutOfRange {
                name: 'A',
                value: 100
            })
        );
        assert_eq!(
            RunConfig::new(0, -100, 1).validate(),
            Err(ConfigError::ParameterOutOfRange {
                name: 'B',
                value: -100
            })
        );
    }

    #[test]
    fn zero_budgets_rejected() {
        assert_eq!(RunConfig::new(0, 0, 0).validate(), Err(ConfigError::ZeroSteps));
        let c = RunConfig {
            max_transitions: 0,
            ..RunConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroTransitionBudget));
    }

    #[test]
    fn error_display() {
        let e = ConfigError::ParameterOutOfRange {
            name: 'A',
            value: 120,
        };
        assert_eq!(e.to_string(), "parameter A=120 must be from -99 to 99");
    }
}
