//! Single-run simulation driver.
//!
//! [`Simulation`] owns the history and commits transitions planned by
//! the [`StepEngine`]. Each call to [`step()`](Simulation::step) runs
//! exactly one transition; [`run()`](Simulation::run) repeats it until
//! the requested time is reached or the program halts.
//!
//! # Ownership model
//!
//! `Simulation` is [`Send`] and mutated through `&mut self` only.
//! [`step()`](Simulation::step) returns a [`StepResult`] that borrows the
//! current grid from `self`, so the caller cannot step again while
//! holding it.

use tracing::{debug, info, trace};
use warpgrid_core::{Diagnostics, Grid, Pos, Program, StepError, StepId};

use crate::config::{ConfigError, RunConfig};
use crate::history::History;
use crate::metrics::{RunMetrics, StepMetrics};
use crate::run::{RunReport, RunResult};
use crate::step::{StepEngine, StepOutcome, Transition};

// Compile-time assertion: Simulation is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

// ── StepEvent ──────────────────────────────────────────────────────

/// What a committed step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// Time moved forward to `step`.
    Advanced {
        /// The newly reached step.
        step: StepId,
    },
    /// A sink received `value`. The simulation is finished.
    Halted {
        /// The program's answer.
        value: i64,
        /// The sink that received it.
        sink: Pos,
    },
    /// A warp moved time back from `from` to `to`.
    RolledBack {
        /// Step at which the warp fired.
        from: StepId,
        /// Step the simulation landed on.
        to: StepId,
        /// Steps travelled back.
        dt: i64,
    },
}

/// Result of a successful [`Simulation::step()`] call.
#[derive(Debug)]
pub struct StepResult<'s> {
    /// What happened.
    pub event: StepEvent,
    /// The current grid after the step.
    pub grid: &'s Grid,
    /// Metrics for this step.
    pub metrics: StepMetrics,
}

// ── Simulation ─────────────────────────────────────────────────────

/// One program run from a fixed initial grid.
///
/// # Example
///
/// ```
/// use warpgrid_core::Program;
/// use warpgrid_engine::{RunConfig, RunResult, Simulation};
///
/// let program = Program::parse(". A .\nB + S\n. . .");
/// let mut sim = Simulation::new(program, RunConfig::new(3, 5, 10)).unwrap();
/// let report = sim.run().unwrap();
/// assert_eq!(report.result, RunResult::Halted(8));
/// ```
pub struct Simulation {
    engine: StepEngine,
    config: RunConfig,
    initial: Grid,
    history: History,
    structural: Diagnostics,
    runtime: Diagnostics,
    metrics: RunMetrics,
    halted: Option<(i64, Pos)>,
}

impl Simulation {
    /// Build a simulation for `program` under `config`.
    ///
    /// Validates the configuration, substitutes the inputs, and seeds
    /// the history with the resulting grid as step 0.
    pub fn new(program: Program, config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let Program { grid, diagnostics } = program;
        if config.strict && !diagnostics.is_empty() {
            return Err(ConfigError::StructuralDiagnostics {
                count: diagnostics.len(),
            });
        }
        let initial = grid.substitute_inputs(config.a, config.b);
        Ok(Self {
            engine: StepEngine::new(config.rounding),
            history: History::new(initial.clone()),
            initial,
            config,
            structural: diagnostics,
            runtime: Diagnostics::new(),
            metrics: RunMetrics::default(),
            halted: None,
        })
    }

    /// Commit one transition.
    ///
    /// Once the simulation has halted, further calls return the same
    /// [`StepEvent::Halted`] without doing any work.
    ///
    /// # Errors
    ///
    /// [`StepError::InvalidRollbackTarget`] if a warp's `dt` is negative
    /// or reaches before step 0;
    /// [`StepError::TransitionBudgetExhausted`] once
    /// `max_transitions` transitions have been committed. The
    /// simulation is left unchanged in both cases.
    pub fn step(&mut self) -> Result<StepResult<'_>, StepError> {
        if let Some((value, sink)) = self.halted {
            return Ok(StepResult {
                event: StepEvent::Halted { value, sink },
                grid: self.history.latest(),
                metrics: StepMetrics::default(),
            });
        }
        if self.metrics.transitions >= self.config.max_transitions {
            return Err(StepError::TransitionBudgetExhausted {
                transitions: self.metrics.transitions,
            });
        }

        let Transition {
            outcome,
            diagnostics,
            metrics,
        } = self.engine.plan(self.history.latest(), &self.history)?;

        let event = match outcome {
            StepOutcome::Advance(next) => {
                let step = self.history.push(next);
                self.metrics.transitions += 1;
                self.metrics.advances += 1;
                trace!(%step, "advance");
                StepEvent::Advanced { step }
            }
            StepOutcome::Halt { value, sink } => {
                self.halted = Some((value, sink));
                debug!(step = %self.history.current(), value, "halted");
                StepEvent::Halted { value, sink }
            }
            StepOutcome::Rollback { grid, target, dt } => {
                let from = self.history.current();
                let discarded = self.history.rewind(target, grid)?;
                self.metrics.transitions += 1;
                self.metrics.rollbacks += 1;
                self.metrics.discarded_steps += discarded;
                debug!(%from, to = %target, discarded, "rolled back");
                StepEvent::RolledBack {
                    from,
                    to: target,
                    dt,
                }
            }
        };
        self.metrics.record(&metrics);
        self.runtime = diagnostics;

        Ok(StepResult {
            event,
            grid: self.history.latest(),
            metrics,
        })
    }

    /// Step until the requested time is reached or the program halts.
    ///
    /// The report's runtime diagnostics cover this call only, gathered
    /// across all of its steps.
    pub fn run(&mut self) -> Result<RunReport, StepError> {
        info!(
            rows = self.initial.rows(),
            cols = self.initial.cols(),
            steps = self.config.steps,
            time = self.time(),
            "run started"
        );
        let mut runtime = Diagnostics::new();
        while self.time() < self.config.steps {
            let event = self.step()?.event;
            runtime.extend(self.runtime.iter().map(|(k, m)| (*k, m.to_owned())));
            if let StepEvent::Halted { value, .. } = event {
                info!(value, transitions = self.metrics.transitions, "run halted");
                return Ok(self.report(RunResult::Halted(value), runtime));
            }
        }
        info!(
            time = self.time(),
            transitions = self.metrics.transitions,
            rollbacks = self.metrics.rollbacks,
            "run finished"
        );
        Ok(self.report(RunResult::Finished(self.grid().clone()), runtime))
    }

    fn report(&self, result: RunResult, runtime: Diagnostics) -> RunReport {
        RunReport {
            result,
            structural: self.structural.clone(),
            runtime,
            metrics: self.metrics.clone(),
        }
    }

    /// Plan the next transition without committing it.
    pub fn peek(&self) -> Result<Transition, StepError> {
        self.engine.plan(self.history.latest(), &self.history)
    }

    /// Whether the next transition would advance to an identical grid.
    ///
    /// A halted simulation, or one whose next step would fail, is not
    /// stuck.
    pub fn is_stuck(&self) -> bool {
        if self.halted.is_some() {
            return false;
        }
        matches!(
            self.peek(),
            Ok(Transition { outcome: StepOutcome::Advance(next), .. }) if next == *self.grid()
        )
    }

    /// Restore the post-substitution initial grid and clear all counters.
    pub fn reset(&mut self) {
        self.history = History::new(self.initial.clone());
        self.runtime.clear();
        self.metrics = RunMetrics::default();
        self.halted = None;
    }

    /// The current grid.
    pub fn grid(&self) -> &Grid {
        self.history.latest()
    }

    /// All snapshots up to the current step.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Completed steps (0 after construction or reset).
    pub fn current_step(&self) -> StepId {
        self.history.current()
    }

    /// The 1-based time of the current grid.
    pub fn time(&self) -> u64 {
        self.history.current().time()
    }

    /// The halt value, if a sink has been reached.
    pub fn halted(&self) -> Option<i64> {
        self.halted.map(|(value, _)| value)
    }

    /// Structural diagnostics from parsing.
    pub fn structural_diagnostics(&self) -> &Diagnostics {
        &self.structural
    }

    /// Runtime diagnostics from the most recent step.
    pub fn runtime_diagnostics(&self) -> &Diagnostics {
        &self.runtime
    }

    /// Cumulative counters since construction or reset.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// The configuration this simulation was built with.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("current_step", &self.history.current())
            .field("rows", &self.initial.rows())
            .field("cols", &self.initial.cols())
            .field("halted", &self.halted)
            .field("transitions", &self.metrics.transitions)
            .finish()
    }
}
