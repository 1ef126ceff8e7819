//! queueing-demo — smallest end-to-end scenario for the rust_ped framework.
//!
//! A cluster of pedestrians spawns on the plaza, walks to a checkout queue,
//! lines up, gets served one by one, and leaves through the exit.  Positions
//! and queue occupancy land in `output/queueing/` as CSV.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use ped_core::{SimConfig, Tick};
use ped_output::{CsvWriter, SimOutputObserver};
use ped_scene::{Scene, load_scenario_reader};
use ped_sim::{SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 42;
const TIME_STEP_SECS:        f64 = 0.05; // 20 Hz integration
const TICKS_PER_SEC:         u64 = 20;
const SIM_SECONDS:           u64 = 180;
const OUTPUT_INTERVAL_TICKS: u64 = 20;   // snapshot once per simulated second

// ── Scenario ──────────────────────────────────────────────────────────────────

// Eight pedestrians spawn west of the plaza; the checkout queue faces east
// (direction 0°, toward its anchor), so the line forms to the west of it.
const SCENARIO_JSON: &str = r#"{
  "waypoints": [
    { "name": "exit", "x": 45.0, "y": 0.0, "radius": 2.5 }
  ],
  "queues": [
    { "name": "checkout", "x": 25.0, "y": 0.0, "direction_deg": 0.0, "wait_ticks": 60 }
  ],
  "clusters": [
    { "x": 0.0, "y": 0.0, "count": 8, "spread_x": 6.0, "spread_y": 6.0,
      "route": ["checkout", "exit"] }
  ]
}"#;

// ── Progress observer ─────────────────────────────────────────────────────────

struct Progress<W: ped_output::OutputWriter> {
    inner:          SimOutputObserver<W>,
    total_released: usize,
}

impl<W: ped_output::OutputWriter> Progress<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, total_released: 0 }
    }
}

impl<W: ped_output::OutputWriter> SimObserver for Progress<W> {
    fn on_tick_end(&mut self, tick: Tick, released: usize) {
        if released > 0 {
            self.total_released += released;
            println!("  {tick}: {released} served ({} total)", self.total_released);
        }
        self.inner.on_tick_end(tick, released);
    }

    fn on_snapshot(&mut self, tick: Tick, scene: &Scene) {
        self.inner.on_snapshot(tick, scene);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== queueing-demo — rust_ped crowd framework ===");

    // 1. Load the embedded scenario.
    let scene = load_scenario_reader(Cursor::new(SCENARIO_JSON), SEED)?;
    println!(
        "Scene: {} agents, {} queues, {} waypoints",
        scene.agents().len(),
        scene.queues().len(),
        scene.waypoints().len()
    );

    // 2. Sim config.
    let config = SimConfig {
        time_step_secs:        TIME_STEP_SECS,
        total_ticks:           SIM_SECONDS * TICKS_PER_SEC,
        seed:                  SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };
    println!(
        "Sim: {} ticks ({} s at {} s/tick)",
        config.total_ticks, SIM_SECONDS, TIME_STEP_SECS
    );
    println!();

    // 3. Build sim and output.
    let mut sim = SimBuilder::new(config.clone(), scene).build()?;

    std::fs::create_dir_all("output/queueing")?;
    let writer = CsvWriter::new(Path::new("output/queueing"))?;
    let mut observer = Progress::new(SimOutputObserver::new(writer, &config));

    // 4. Run.
    let t0 = Instant::now();
    sim.run(&mut observer)?;
    let elapsed = t0.elapsed();

    if let Some(e) = observer.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s wall time", elapsed.as_secs_f64());
    println!("Agents served: {}", observer.total_released);
    println!();
    println!("{:<8} {:<22} {:<10}", "Agent", "Position", "Speed");
    println!("{}", "-".repeat(42));
    for agent in sim.scene.agents() {
        println!(
            "{:<8} {:<22} {:<10.2}",
            agent.id().0,
            agent.position().to_string(),
            agent.velocity().length()
        );
    }
    for queue in sim.scene.queues() {
        println!("\n{queue}");
    }

    Ok(())
}
