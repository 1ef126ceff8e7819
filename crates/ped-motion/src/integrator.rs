//! Movement integration: compose the enabled forces and step the agent.

use ped_core::{AgentId, AgentRng, Vec2};
use ped_scene::{Agent, ForceKind};

use crate::forces::{
    ForceConfig, desired_force, group_coherence_force, group_gaze_force, random_force,
    social_force,
};

/// Semi-implicit Euler integrator over the social-force model.
///
/// Per step: sum the forces the agent has enabled, advance velocity, clamp
/// to `max_speed`, advance position.  The position write goes through
/// [`Agent::set_position`], so position-changed subscribers (queueing
/// planners of agents behind this one) are notified synchronously, within the
/// same tick.
pub struct Integrator {
    pub config: ForceConfig,
}

impl Integrator {
    pub fn new(config: ForceConfig) -> Self {
        Self { config }
    }

    /// Advance `agent` by `dt` seconds.
    ///
    /// `target` is the planner's current waypoint position (None = idle,
    /// brake to a stop).  `neighbors` come from the scene's per-tick spatial
    /// index; `group_centroid` from the agent's walking group, if any.
    pub fn step(
        &self,
        agent:          &Agent,
        target:         Option<Vec2>,
        neighbors:      &[(AgentId, Vec2)],
        group_centroid: Option<Vec2>,
        rng:            &mut AgentRng,
        dt:             f64,
    ) {
        let position = agent.position();
        let velocity = agent.velocity();
        let config = &self.config;

        let mut force = Vec2::ZERO;
        if agent.force_enabled(ForceKind::Desired) {
            force += desired_force(position, velocity, target, config);
        }
        if agent.force_enabled(ForceKind::Social) && !neighbors.is_empty() {
            force += social_force(position, neighbors, config);
        }
        if agent.force_enabled(ForceKind::Random) {
            force += random_force(rng, config);
        }
        if agent.force_enabled(ForceKind::GroupCoherence) {
            force += group_coherence_force(position, group_centroid, config);
        }
        if agent.force_enabled(ForceKind::GroupGaze) {
            force += group_gaze_force(position, velocity, group_centroid, config);
        }

        let mut next_velocity = velocity + force * dt;
        let speed = next_velocity.length();
        if speed > config.max_speed {
            next_velocity = next_velocity.normalized() * config.max_speed;
        }

        agent.set_velocity(next_velocity);
        agent.set_position(position + next_velocity * dt);
    }
}
