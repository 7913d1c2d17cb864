//! Per-step and per-run counters.
//!
//! [`StepMetrics`] describes a single transition; [`RunMetrics`]
//! accumulates them over a whole run.

/// Operator activity and timing for one transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Movers that scheduled a move.
    pub moves: u32,
    /// Arithmetic operators that fired.
    pub arithmetic: u32,
    /// Comparison operators that fired.
    pub comparisons: u32,
    /// Warp events scheduled (after bounds filtering).
    pub warps: u32,
    /// Inserts rejected because the target was occupied.
    pub conflicts: u32,
    /// Cells that received a value.
    pub cells_written: u32,
    /// Wall-clock time for planning the transition, in microseconds.
    pub total_us: u64,
}

/// Cumulative counters for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Transitions of any kind (advances plus rollbacks).
    pub transitions: u64,
    /// Forward steps committed.
    pub advances: u64,
    /// Time warps applied.
    pub rollbacks: u64,
    /// Steps discarded by rollbacks.
    pub discarded_steps: u64,
    /// Write conflicts over the whole run.
    pub conflicts: u64,
    /// Total planning time, in microseconds.
    pub total_us: u64,
}

impl RunMetrics {
    /// Fold one transition's metrics into the totals.
    pub(crate) fn record(&mut self, step: &StepMetrics) {
        self.conflicts += u64::from(step.conflicts);
        self.total_us += step.total_us;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.moves, 0);
        assert_eq!(m.conflicts, 0);
        assert_eq!(m.total_us, 0);
        let r = RunMetrics::default();
        assert_eq!(r.transitions, 0);
        assert_eq!(r.rollbacks, 0);
    }

    #[test]
    fn record_accumulates() {
        let mut r = RunMetrics::default();
        let s = StepMetrics {
            conflicts: 2,
            total_us: 10,
            ..StepMetrics::default()
        };
        r.record(&s);
        r.record(&s);
        assert_eq!(r.conflicts, 4);
        assert_eq!(r.total_us, 20);
    }
}
