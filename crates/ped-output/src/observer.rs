//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use ped_core::{SimConfig, Tick};
use ped_scene::Scene;
use ped_sim::SimObserver;

use crate::OutputError;
use crate::row::{AgentSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;

/// A [`SimObserver`] that writes agent snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Rows are produced at snapshot ticks; the release count from the preceding
/// `on_tick_end` is folded into the same summary row.  Errors from the writer
/// are stored internally because `SimObserver` methods have no return value —
/// after `sim.run()` returns, check with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    time_step_secs:     f64,
    released_this_tick: u64,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for sim-time
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            time_step_secs:     config.time_step_secs,
            released_this_tick: 0,
            last_error:         None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, released: usize) {
        self.released_this_tick = released as u64;
    }

    fn on_snapshot(&mut self, tick: Tick, scene: &Scene) {
        let rows: Vec<AgentSnapshotRow> = scene
            .agents()
            .iter()
            .map(|agent| {
                let position = agent.position();
                AgentSnapshotRow {
                    agent_id: agent.id().0,
                    tick:     tick.0,
                    x:        position.x,
                    y:        position.y,
                }
            })
            .collect();
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);

        let queued: u64 = scene.queues().iter().map(|q| q.len() as u64).sum();
        let summary = TickSummaryRow {
            tick:            tick.0,
            sim_time_secs:   tick.0 as f64 * self.time_step_secs,
            queued_agents:   queued,
            released_agents: self.released_this_tick,
        };
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
