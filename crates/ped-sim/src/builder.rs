//! Fluent builder for constructing a [`Sim`].

use ped_core::SimConfig;
use ped_motion::{ForceConfig, Integrator};
use ped_scene::Scene;

use crate::{AgentController, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, time step, …
/// - [`Scene`] — agents, queues, waypoints (typically from a scenario file)
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                 |
/// |---------------|-------------------------|
/// | `.forces(f)`  | `ForceConfig::default()`|
///
/// # Example
///
/// ```rust,ignore
/// let scene = load_scenario(Path::new("plaza.json"), config.seed)?;
/// let mut sim = SimBuilder::new(config, scene).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    scene:  Scene,
    forces: Option<ForceConfig>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, scene: Scene) -> Self {
        Self {
            config,
            scene,
            forces: None,
        }
    }

    /// Override the steering force tuning.
    pub fn forces(mut self, forces: ForceConfig) -> Self {
        self.forces = Some(forces);
        self
    }

    /// Validate inputs, build per-agent controllers, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        if self.config.time_step_secs <= 0.0 {
            return Err(SimError::Config(format!(
                "time_step_secs must be positive, got {}",
                self.config.time_step_secs
            )));
        }

        let integrator = Integrator::new(self.forces.unwrap_or_default());

        let controllers: Vec<AgentController> = self
            .scene
            .agents()
            .iter()
            .map(|agent| AgentController::new(agent.clone(), self.config.seed))
            .collect();

        Ok(Sim::new(self.config, self.scene, integrator, controllers))
    }
}
