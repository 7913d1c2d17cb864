//! Step engine: computes one synchronous transition.
//!
//! [`StepEngine::plan`] is pure. It reads the current grid and the
//! history and returns a [`Transition`] describing what should happen;
//! committing it (pushing or rewinding history) is the driver's job.
//!
//! # Phases
//!
//! 1. **Discovery.** One row-major scan collects candidate effects into
//!    four lists: moves, arithmetic, comparisons, warps.
//! 2. **Sink check.** The first write (in list order) landing on an `S`
//!    halts the run with that value; nothing else takes effect.
//! 3. **Warp resolution.** If any warp fired, the run rolls back to a
//!    rewritten copy of an earlier snapshot instead of advancing. Warp
//!    writes overwrite whatever the snapshot holds, last write wins.
//! 4. **Commit.** All clears are applied, then all inserts in discovery
//!    order. An insert onto a non-empty cell is rejected with a
//!    conflict diagnostic (first writer wins).
//!
//! Every read observes the grid as it was before the step began.

use std::time::Instant;

use indexmap::IndexSet;
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};
use warpgrid_core::{
    BinaryOp, Cell, Diagnostics, Direction, DivisionRounding, Grid, Pos, StepError, StepId,
};

use crate::history::History;
use crate::metrics::StepMetrics;

// ── Scheduled effects ──────────────────────────────────────────────

/// A value scheduled to land on `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Write {
    /// Destination cell.
    pub target: Pos,
    /// Value to store.
    pub value: i64,
}

/// Clears and writes scheduled by one operator.
///
/// Movers and operators touch at most two cells each way, so both
/// lists stay inline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Effect {
    clears: SmallVec<[Pos; 2]>,
    writes: SmallVec<[Write; 2]>,
}

/// A fired warp: write `value` at `target` in the snapshot `dt` steps back.
///
/// An off-grid target still takes part in the rollback; only its write
/// is lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarpEvent {
    /// The `@` cell that fired.
    pub source: Pos,
    /// Cell to rewrite in the past snapshot, `None` if off the grid.
    pub target: Option<Pos>,
    /// Value to write.
    pub value: i64,
    /// How many steps to travel back.
    pub dt: i64,
}

/// Candidate effects from the discovery scan, each list row-major.
#[derive(Debug, Default)]
struct Discovery {
    moves: Vec<Effect>,
    arithmetic: Vec<Effect>,
    comparisons: Vec<Effect>,
    warps: Vec<WarpEvent>,
}

impl Discovery {
    /// Non-warp effects in conflict-resolution order: moves, then
    /// arithmetic, then comparisons.
    fn effects(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.moves
            .iter()
            .chain(&self.arithmetic)
            .chain(&self.comparisons)
    }
}

// ── Transition ─────────────────────────────────────────────────────

/// What a step does to the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Time moves forward by one; the grid becomes `next`.
    Advance(Grid),
    /// A write reached a sink. The run is over and `value` is its answer.
    Halt {
        /// The value written into the sink.
        value: i64,
        /// The sink that received it.
        sink: Pos,
    },
    /// Time moves back by `dt` to `target`, whose snapshot is replaced
    /// by `grid`.
    Rollback {
        /// The rewritten snapshot, becoming the current grid.
        grid: Grid,
        /// Step the run lands on.
        target: StepId,
        /// Steps travelled back.
        dt: i64,
    },
}

/// A planned transition with the runtime diagnostics and metrics it
/// produced.
#[derive(Clone, Debug)]
pub struct Transition {
    /// What happens.
    pub outcome: StepOutcome,
    /// Runtime diagnostics raised by this step only.
    pub diagnostics: Diagnostics,
    /// Operator activity for this step.
    pub metrics: StepMetrics,
}

// ── StepEngine ─────────────────────────────────────────────────────

/// Computes transitions under a fixed division rounding.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepEngine {
    rounding: DivisionRounding,
}

impl StepEngine {
    /// Create an engine using `rounding` for `/` and `%`.
    pub fn new(rounding: DivisionRounding) -> Self {
        Self { rounding }
    }

    /// The configured rounding.
    pub fn rounding(&self) -> DivisionRounding {
        self.rounding
    }

    /// Plan the transition from `grid`, the current grid at
    /// `history.current()`.
    ///
    /// # Errors
    ///
    /// [`StepError::InvalidRollbackTarget`] if a warp asks for a
    /// snapshot before step 0 or a negative `dt`.
    pub fn plan(&self, grid: &Grid, history: &History) -> Result<Transition, StepError> {
        let start = Instant::now();
        let mut diagnostics = Diagnostics::new();

        // 1. Discovery.
        let discovery = self.discover(grid, &mut diagnostics);
        let mut metrics = StepMetrics {
            moves: discovery.moves.len() as u32,
            arithmetic: discovery.arithmetic.len() as u32,
            comparisons: discovery.comparisons.len() as u32,
            warps: discovery.warps.len() as u32,
            ..StepMetrics::default()
        };
        trace!(
            step = %history.current(),
            moves = metrics.moves,
            arithmetic = metrics.arithmetic,
            comparisons = metrics.comparisons,
            warps = metrics.warps,
            "discovery complete"
        );

        // 2. Sink check.
        let outcome = if let Some((sink, value)) = find_sink_write(grid, &discovery) {
            debug!(step = %history.current(), %sink, value, "sink reached");
            metrics.cells_written = 1;
            StepOutcome::Halt { value, sink }
        // 3. Warp resolution.
        } else if let Some(first) = discovery.warps.first() {
            let dt = first.dt;
            resolve_warps(history, dt, &discovery.warps, &mut diagnostics, &mut metrics)?
        // 4. Commit.
        } else {
            StepOutcome::Advance(commit(grid, &discovery, &mut diagnostics, &mut metrics))
        };

        metrics.total_us = start.elapsed().as_micros() as u64;
        Ok(Transition {
            outcome,
            diagnostics,
            metrics,
        })
    }

    /// Scan the grid once, row-major, sorting candidate effects by kind.
    fn discover(&self, grid: &Grid, diagnostics: &mut Diagnostics) -> Discovery {
        let mut discovery = Discovery::default();
        for (pos, cell) in grid.iter() {
            match *cell {
                Cell::Mover(dir) => {
                    if let Some(effect) = discover_move(grid, pos, dir) {
                        discovery.moves.push(effect);
                    }
                }
                Cell::BinaryOp(op) if op.is_comparison() => {
                    if let Some(effect) = discover_comparison(grid, pos, op) {
                        discovery.comparisons.push(effect);
                    }
                }
                Cell::BinaryOp(op) => {
                    if let Some(effect) = self.discover_arithmetic(grid, pos, op, diagnostics) {
                        discovery.arithmetic.push(effect);
                    }
                }
                Cell::Warp => {
                    if let Some(event) = discover_warp(grid, pos, diagnostics) {
                        discovery.warps.push(event);
                    }
                }
                Cell::Empty
                | Cell::Number(_)
                | Cell::Sink
                | Cell::InputA
                | Cell::InputB => {}
            }
        }
        discovery
    }

    fn discover_arithmetic(
        &self,
        grid: &Grid,
        pos: Pos,
        op: BinaryOp,
        diagnostics: &mut Diagnostics,
    ) -> Option<Effect> {
        let ((left_pos, left), (up_pos, up)) = operands(grid, pos)?;
        let Some(result) = op.apply(left, up, self.rounding) else {
            diagnostics.arithmetic_fault(pos, left, op.symbol(), up);
            return None;
        };
        Some(Effect {
            clears: smallvec![left_pos, up_pos],
            writes: outputs(grid, pos, result, result),
        })
    }
}

/// Left and upper operands of a binary operator at `pos`, both numbers.
fn operands(grid: &Grid, pos: Pos) -> Option<((Pos, i64), (Pos, i64))> {
    let left_pos = grid.neighbour(pos, Direction::Left)?;
    let up_pos = grid.neighbour(pos, Direction::Up)?;
    let left = grid.number_at(left_pos)?;
    let up = grid.number_at(up_pos)?;
    Some(((left_pos, left), (up_pos, up)))
}

/// Writes to the right and lower neighbours, dropping any off-grid.
fn outputs(grid: &Grid, pos: Pos, right: i64, down: i64) -> SmallVec<[Write; 2]> {
    [(Direction::Right, right), (Direction::Down, down)]
        .into_iter()
        .filter_map(|(dir, value)| {
            grid.neighbour(pos, dir)
                .map(|target| Write { target, value })
        })
        .collect()
}

fn discover_move(grid: &Grid, pos: Pos, dir: Direction) -> Option<Effect> {
    let from = grid.neighbour(pos, dir.opposite())?;
    let to = grid.neighbour(pos, dir)?;
    let value = grid.number_at(from)?;
    if !grid.get(to)?.is_empty() {
        return None;
    }
    Some(Effect {
        clears: smallvec![from],
        writes: smallvec![Write { target: to, value }],
    })
}

/// `=`/`#`: on fire, the upper value goes right and the left value goes
/// down.
fn discover_comparison(grid: &Grid, pos: Pos, op: BinaryOp) -> Option<Effect> {
    let ((left_pos, left), (up_pos, up)) = operands(grid, pos)?;
    if !op.fires(left, up) {
        return None;
    }
    Some(Effect {
        clears: smallvec![left_pos, up_pos],
        writes: outputs(grid, pos, up, left),
    })
}

/// `@` reads value (up), dx (left), dy (right) and dt (down). It clears
/// nothing.
fn discover_warp(grid: &Grid, pos: Pos, diagnostics: &mut Diagnostics) -> Option<WarpEvent> {
    let read = |dir: Direction| grid.neighbour(pos, dir).and_then(|p| grid.number_at(p));
    let value = read(Direction::Up)?;
    let dx = read(Direction::Left)?;
    let dy = read(Direction::Right)?;
    let dt = read(Direction::Down)?;

    let target = dy
        .checked_neg()
        .zip(dx.checked_neg())
        .and_then(|(d_row, d_col)| grid.offset(pos, d_row, d_col));
    if target.is_none() {
        diagnostics.warp_out_of_bounds(pos, dx, dy);
    }
    Some(WarpEvent {
        source: pos,
        target,
        value,
        dt,
    })
}

/// First scheduled write (moves, arithmetic, comparisons) that lands on
/// a sink.
fn find_sink_write(grid: &Grid, discovery: &Discovery) -> Option<(Pos, i64)> {
    discovery
        .effects()
        .flat_map(|effect| effect.writes.iter())
        .find(|w| matches!(grid.get(w.target), Some(Cell::Sink)))
        .map(|w| (w.target, w.value))
}

/// Roll back by `dt`, the first-discovered delta, rewriting the target
/// snapshot with every warp write.
fn resolve_warps(
    history: &History,
    dt: i64,
    warps: &[WarpEvent],
    diagnostics: &mut Diagnostics,
    metrics: &mut StepMetrics,
) -> Result<StepOutcome, StepError> {
    let dts: IndexSet<i64> = warps.iter().map(|w| w.dt).collect();
    if dts.len() > 1 {
        let all: Vec<i64> = dts.iter().copied().collect();
        diagnostics.warp_time_mismatch(&all);
    }

    let target = history.rollback_target(dt)?;
    let mut past = history
        .get(target)
        .cloned()
        .ok_or(StepError::InvalidRollbackTarget {
            current: history.current(),
            dt,
        })?;

    for warp in warps {
        // Bounds were checked against the current grid, which has the
        // same shape as every snapshot.
        let Some(slot) = warp.target.and_then(|t| past.get_mut(t)) else {
            continue;
        };
        *slot = Cell::Number(warp.value);
        metrics.cells_written += 1;
    }

    debug!(
        from = %history.current(),
        to = %target,
        dt,
        writes = warps.len(),
        "time warp"
    );
    Ok(StepOutcome::Rollback {
        grid: past,
        target,
        dt,
    })
}

/// Apply every clear, then every insert in discovery order.
fn commit(
    grid: &Grid,
    discovery: &Discovery,
    diagnostics: &mut Diagnostics,
    metrics: &mut StepMetrics,
) -> Grid {
    let mut next = grid.clone();
    for pos in discovery.effects().flat_map(|e| e.clears.iter()) {
        if let Some(slot) = next.get_mut(*pos) {
            *slot = Cell::Empty;
        }
    }
    for write in discovery.effects().flat_map(|e| e.writes.iter()) {
        let Some(slot) = next.get_mut(write.target) else {
            continue;
        };
        if slot.is_empty() {
            *slot = Cell::Number(write.value);
            metrics.cells_written += 1;
        } else {
            debug!(pos = %write.target, attempted = write.value, existing = %slot, "write conflict");
            diagnostics.write_conflict(write.target, write.value, *slot);
            metrics.conflicts += 1;
        }
    }
    next
}
