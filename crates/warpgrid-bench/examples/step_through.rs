//! Step a time-warping program one transition at a time.
//!
//! Demonstrates: parse → Simulation → step → inspect events, grid and
//! diagnostics → run to completion. Set `RUST_LOG=debug` to see the
//! engine's own trace of rollbacks and halts.

use warpgrid_core::Program;
use warpgrid_engine::{run, RunConfig, Simulation, StepEvent};
use warpgrid_test_utils::fixtures;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== warpgrid step-through ===\n");
    println!("{}\n", fixtures::WARP_TO_SINK);

    let program = Program::parse(fixtures::WARP_TO_SINK);
    let mut sim = Simulation::new(program, RunConfig::new(41, 0, 20)).unwrap();

    loop {
        let result = sim.step().unwrap();
        let event = result.event;
        println!(
            "{event:?} ({} cells written, {}μs)",
            result.metrics.cells_written, result.metrics.total_us
        );
        println!("{}\n", result.grid);
        match event {
            StepEvent::Halted { value, .. } => {
                println!("halted with {value}");
                break;
            }
            StepEvent::Advanced { .. } | StepEvent::RolledBack { .. } => {}
        }
    }
    println!("metrics: {:?}\n", sim.metrics());

    // The same program through the one-shot entry point.
    let report = run(fixtures::WARP_TO_SINK, &RunConfig::new(41, 0, 20)).unwrap();
    println!("run(): {}", report.result);
}
