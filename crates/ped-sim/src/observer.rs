//! Simulation observer trait for progress reporting and data collection.

use ped_core::Tick;
use ped_scene::Scene;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, released: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: released {released} agents from queues");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `released` is the number of agents granted pass permission by queue
    /// service this tick.
    fn on_tick_end(&mut self, _tick: Tick, _released: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks).
    ///
    /// Provides read-only access to the scene so output writers can record
    /// positions and queue occupancy without the sim knowing about any
    /// specific output format.
    fn on_snapshot(&mut self, _tick: Tick, _scene: &Scene) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
