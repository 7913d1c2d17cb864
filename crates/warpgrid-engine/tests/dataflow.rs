//! Integration test: forward dataflow over several steps.
//!
//! Covers mover transport, operator firing and the first-writer-wins
//! conflict rule as observed through `run`.

use warpgrid_core::{DiagnosticKey, DivisionRounding, Pos};
use warpgrid_engine::{run, RunConfig, RunResult};
use warpgrid_test_utils::{fixtures, grid};

fn finished(text: &str, config: &RunConfig) -> String {
    match run(text, config).unwrap().result {
        RunResult::Finished(g) => g.to_string(),
        RunResult::Halted(v) => panic!("unexpected halt with {v}"),
    }
}

#[test]
fn mover_chain_carries_value_to_the_edge() {
    assert_eq!(
        finished(fixtures::MOVER_CHAIN, &RunConfig::new(0, 0, 2)),
        ". > 1 > . > ."
    );
    assert_eq!(
        finished(fixtures::MOVER_CHAIN, &RunConfig::new(0, 0, 4)),
        ". > . > . > 1"
    );
    // Stuck at the edge from then on.
    assert_eq!(
        finished(fixtures::MOVER_CHAIN, &RunConfig::new(0, 0, 50)),
        ". > . > . > 1"
    );
}

#[test]
fn arithmetic_reference_case() {
    let out = finished(". 3 .\n5 + .\n. . .", &RunConfig::new(0, 0, 2));
    assert_eq!(out, ". . .\n. + 8\n. 8 .");
}

#[test]
fn inputs_feed_operators() {
    let out = finished(". A .\nB * .\n. . .", &RunConfig::new(-4, 6, 2));
    assert_eq!(out, ". . .\n. * -24\n. -24 .");
}

#[test]
fn negative_division_follows_rounding() {
    let text = ". 2 .\nA / .\n. . .";
    let floor = finished(text, &RunConfig::new(-7, 0, 2));
    let trunc = finished(
        text,
        &RunConfig {
            rounding: DivisionRounding::Truncate,
            ..RunConfig::new(-7, 0, 2)
        },
    );
    assert_eq!(floor, ". . .\n. / -4\n. -4 .");
    assert_eq!(trunc, ". . .\n. / -3\n. -3 .");
}

#[test]
fn results_may_leave_the_literal_range() {
    let out = finished(". 99 .\n99 * .\n. . .", &RunConfig::new(0, 0, 2));
    assert_eq!(out, ". . .\n. * 9801\n. 9801 .");
}

#[test]
fn conflict_reports_first_writer() {
    let report = run(fixtures::MOVER_CONFLICT, &RunConfig::new(0, 0, 2)).unwrap();
    assert_eq!(report.result, RunResult::Finished(grid(". > 1 < .")));
    let key = DiagnosticKey::WriteConflict(Pos::new(0, 2));
    assert_eq!(
        report.runtime.get(&key),
        Some("conflict at (0, 2): inserted 2, existing 1")
    );
    assert_eq!(report.metrics.conflicts, 1);
}

#[test]
fn runtime_diagnostics_accumulate_within_a_run() {
    // The conflict happens on the first step only; later steps are quiet.
    let report = run(fixtures::MOVER_CONFLICT, &RunConfig::new(0, 0, 10)).unwrap();
    assert_eq!(report.runtime.len(), 1);
}

#[test]
fn structural_diagnostics_are_reported_not_fatal() {
    let report = run("1 > . ?\n120", &RunConfig::new(0, 0, 2)).unwrap();
    let keys: Vec<_> = report.structural.keys().copied().collect();
    assert_eq!(
        keys,
        vec![
            DiagnosticKey::IllegalToken(Pos::new(0, 3)),
            DiagnosticKey::RaggedRow(1),
            DiagnosticKey::LiteralOutOfRange(Pos::new(1, 0)),
        ]
    );
    assert_eq!(report.result.to_string(), ". > 1 .\n120 . . .");
}
