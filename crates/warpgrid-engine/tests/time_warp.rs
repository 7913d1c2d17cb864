//! Integration test: time warps against a multi-step history.
//!
//! Drives fixtures whose warps only become armed after several forward
//! steps, then checks the rollback target, the rewritten snapshot, the
//! truncated history, and the fatal underflow path.

use warpgrid_core::{Cell, Pos, Program, StepError, StepId};
use warpgrid_engine::{run, RunConfig, RunError, RunResult, Simulation, StepEvent};
use warpgrid_test_utils::{fixtures, grid};

fn simulation(text: &str, config: RunConfig) -> Simulation {
    Simulation::new(Program::parse(text), config).unwrap()
}

#[test]
fn round_trip_lands_on_step_three() {
    let mut sim = simulation(fixtures::WARP_ROUND_TRIP, RunConfig::new(0, 0, 100));
    for expected in 1..=5 {
        let event = sim.step().unwrap().event;
        assert_eq!(
            event,
            StepEvent::Advanced {
                step: StepId(expected)
            }
        );
    }
    let snapshot_3 = sim.history().get(StepId(3)).unwrap().clone();

    let event = sim.step().unwrap().event;
    assert_eq!(
        event,
        StepEvent::RolledBack {
            from: StepId(5),
            to: StepId(3),
            dt: 2
        }
    );
    assert_eq!(sim.current_step(), StepId(3));
    assert_eq!(sim.history().len(), 4);
    assert_eq!(sim.history().get(StepId(4)), None);

    // The warp cell itself is forced to 7; nothing else changes.
    let mut expected = snapshot_3;
    expected.set(Pos::new(1, 1), Cell::Number(7)).unwrap();
    assert_eq!(sim.grid(), &expected);
    assert_eq!(sim.history().latest(), &expected);
    assert_eq!(sim.metrics().discarded_steps, 2);
}

#[test]
fn earlier_snapshots_survive_rollback() {
    let mut sim = simulation(fixtures::WARP_ROUND_TRIP, RunConfig::new(0, 0, 100));
    for _ in 0..5 {
        sim.step().unwrap();
    }
    let before: Vec<_> = sim.history().iter().take(3).cloned().collect();
    sim.step().unwrap();
    let after: Vec<_> = sim.history().iter().take(3).cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn underflow_is_fatal_and_leaves_no_grid() {
    let err = run(fixtures::UNDERFLOW, &RunConfig::new(0, 0, 10)).unwrap_err();
    assert_eq!(
        err,
        RunError::Step(StepError::InvalidRollbackTarget {
            current: StepId(0),
            dt: 3
        })
    );
}

#[test]
fn underflow_leaves_simulation_untouched() {
    let mut sim = simulation(fixtures::UNDERFLOW, RunConfig::new(0, 0, 10));
    assert!(sim.step().is_err());
    assert_eq!(sim.current_step(), StepId(0));
    assert_eq!(sim.grid(), &grid(fixtures::UNDERFLOW));
    assert_eq!(sim.metrics().transitions, 0);
}

#[test]
fn warp_replay_reaches_sink() {
    let report = run(fixtures::WARP_TO_SINK, &RunConfig::new(5, 0, 10)).unwrap();
    assert_eq!(report.result, RunResult::Halted(6));
    assert_eq!(report.metrics.advances, 1);
    assert_eq!(report.metrics.rollbacks, 1);
    assert!(report.runtime.is_empty());
}

#[test]
fn warp_loop_exhausts_budget() {
    let config = RunConfig {
        max_transitions: 50,
        ..RunConfig::new(0, 0, 3)
    };
    let err = run(fixtures::WARP_LOOP, &config).unwrap_err();
    assert_eq!(
        err,
        RunError::Step(StepError::TransitionBudgetExhausted { transitions: 50 })
    );
}

#[test]
fn zero_dt_rewrites_the_present() {
    let mut sim = simulation(". 1 .\n0 @ 0\n. 0 .", RunConfig::new(0, 0, 10));
    let result = sim.step().unwrap();
    assert_eq!(
        result.event,
        StepEvent::RolledBack {
            from: StepId(0),
            to: StepId(0),
            dt: 0
        }
    );
    // The warp overwrote itself, so nothing fires again.
    assert_eq!(result.grid, &grid(". 1 .\n0 1 0\n. 0 ."));
    assert_eq!(sim.history().len(), 1);
    assert_eq!(sim.metrics().discarded_steps, 0);

    let report = run(". 1 .\n0 @ 0\n. 0 .", &RunConfig::new(0, 0, 3)).unwrap();
    assert_eq!(report.result, RunResult::Finished(grid(". 1 .\n0 1 0\n. 0 .")));
    assert_eq!(report.metrics.rollbacks, 1);
}

#[test]
fn negative_dt_is_an_invalid_target() {
    let mut sim = simulation(". 1 .\n0 @ 0\n. -1 .", RunConfig::new(0, 0, 10));
    assert_eq!(
        sim.step().unwrap_err(),
        StepError::InvalidRollbackTarget {
            current: StepId(0),
            dt: -1
        }
    );
    assert_eq!(sim.current_step(), StepId(0));
}
