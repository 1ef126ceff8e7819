//! The `Sim` struct and its tick loop.

use rustc_hash::FxHashMap;

use ped_core::{AgentId, SimClock, SimConfig, Tick, Vec2};
use ped_motion::Integrator;
use ped_scene::{ForceKind, Scene};

use crate::{AgentController, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim` holds the scene, one [`AgentController`] per agent, and the movement
/// integrator, and drives the three-phase tick loop:
///
/// 1. **Queue service**: every waiting queue advances its head-release timer.
///    Pass permissions and tail movements dispatch synchronously into the
///    subscribed queueing planners.
/// 2. **Spatial snapshot**: agent positions go into an R-tree; group
///    centroids are captured.  Both are read-only views of the tick's start.
/// 3. **Plan & move** (sequential, ascending `AgentId` for determinism): each
///    controller advances its route if needed and yields a target; the
///    integrator sums the agent's enabled forces and steps it.  Position
///    writes emit events, so planners of agents further down the line react
///    within the same tick, in production order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, time step, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick.
    pub clock: SimClock,

    /// All scene elements.
    pub scene: Scene,

    /// Movement integration over the social-force model.
    pub integrator: Integrator,

    /// One controller per agent, indexed by `AgentId`.
    controllers: Vec<AgentController>,
}

impl Sim {
    pub(crate) fn new(
        config:      SimConfig,
        scene:       Scene,
        integrator:  Integrator,
        controllers: Vec<AgentController>,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            scene,
            integrator,
            controllers,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.tick_once(now, observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.tick_once(now, observer);
        }
        Ok(())
    }

    fn tick_once<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);
        let released = self.process_tick(now);
        observer.on_tick_end(now, released);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.scene);
        }
        self.clock.advance();
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> usize {
        // ── Phase 1: queue service ────────────────────────────────────────
        //
        // Releasing a head emits pass-permission and end-position events;
        // the subscribed planners transition before any movement happens.
        let mut released = 0;
        for queue in self.scene.queues() {
            if queue.tick(now).is_some() {
                released += 1;
            }
        }

        // ── Phase 2: spatial snapshot ─────────────────────────────────────
        //
        // Neighbor index and group centroids reflect positions at the start
        // of the tick; agents moved earlier in phase 3 don't shift them.
        let neighbor_index = self.scene.neighbor_index();
        let centroids = build_group_centroids(&self.scene);

        // ── Phase 3: plan, steer, integrate (ascending AgentId) ───────────
        let dt = self.config.time_step_secs;
        let radius = self.integrator.config.neighbor_radius;
        for controller in &mut self.controllers {
            let target = controller.current_target();
            let agent = controller.agent().clone();

            let neighbors = if agent.force_enabled(ForceKind::Social) {
                neighbor_index.neighbors_within(agent.position(), radius, agent.id())
            } else {
                Vec::new()
            };
            let centroid = centroids.get(&agent.id()).copied();

            self.integrator
                .step(&agent, target, &neighbors, centroid, controller.rng_mut(), dt);
        }

        released
    }
}

// ── Group centroid snapshot ───────────────────────────────────────────────────

/// Capture each grouped agent's centroid at the start of the tick.
fn build_group_centroids(scene: &Scene) -> FxHashMap<AgentId, Vec2> {
    let mut centroids = FxHashMap::default();
    for group in scene.groups() {
        if let Some(centroid) = group.centroid() {
            for member in group.members() {
                centroids.insert(member.id(), centroid);
            }
        }
    }
    centroids
}
