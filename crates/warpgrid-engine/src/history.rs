//! Snapshot history consulted and truncated by time warps.
//!
//! [`History`] is an append-only `Vec<Grid>` until a warp rewinds it.
//! Index `k` holds the grid at [`StepId(k)`](StepId); index 0 is the
//! post-substitution initial grid. The last snapshot always equals the
//! simulation's current grid.
//!
//! Snapshots are never mutated in place. A warp clones the target
//! snapshot, rewrites the clone, and [`rewind`](History::rewind)
//! installs it after truncating the discarded tail.

use warpgrid_core::{Grid, StepError, StepId};

/// Ordered grid snapshots for one run.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<Grid>,
}

impl History {
    /// Start a history whose step 0 is `initial`.
    pub fn new(initial: Grid) -> Self {
        Self {
            snapshots: vec![initial],
        }
    }

    /// Number of stored snapshots (always at least 1).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always returns `false`: construction stores the initial grid.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Step of the newest snapshot.
    pub fn current(&self) -> StepId {
        StepId(self.snapshots.len() as u64 - 1)
    }

    /// The newest snapshot.
    pub fn latest(&self) -> &Grid {
        // `new` seeds one snapshot and `rewind` never truncates below one.
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Snapshot at `step`, or `None` if it was never reached or was
    /// discarded by a rollback.
    pub fn get(&self, step: StepId) -> Option<&Grid> {
        usize::try_from(step.0)
            .ok()
            .and_then(|i| self.snapshots.get(i))
    }

    /// All snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Grid> + '_ {
        self.snapshots.iter()
    }

    /// Resolve the step a warp of `dt` fired now would land on.
    ///
    /// `dt = 0` lands on the current step itself. A negative `dt` or one
    /// reaching before step 0 has no snapshot.
    pub fn rollback_target(&self, dt: i64) -> Result<StepId, StepError> {
        let current = self.current();
        let invalid = StepError::InvalidRollbackTarget { current, dt };
        let back = u64::try_from(dt).map_err(|_| invalid.clone())?;
        current.0.checked_sub(back).map(StepId).ok_or(invalid)
    }

    /// Append the grid for the next step and return its step ID.
    pub fn push(&mut self, grid: Grid) -> StepId {
        self.snapshots.push(grid);
        self.current()
    }

    /// Discard every snapshot after `target` and replace the snapshot at
    /// `target` with `rewritten`.
    ///
    /// Returns the number of discarded steps.
    pub fn rewind(&mut self, target: StepId, rewritten: Grid) -> Result<u64, StepError> {
        let current = self.current();
        if target > current {
            return Err(StepError::InvalidRollbackTarget {
                current,
                dt: current.0 as i64 - target.0 as i64,
            });
        }
        let keep = target.0 as usize + 1;
        self.snapshots.truncate(keep);
        self.snapshots[keep - 1] = rewritten;
        Ok(current.0 - target.0)
    }
}
