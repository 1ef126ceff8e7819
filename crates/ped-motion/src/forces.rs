//! Steering forces.
//!
//! Each force is a standalone function of the agent's kinematic state and its
//! surroundings, so the integrator can compose exactly the set the agent has
//! enabled.  All magnitudes are accelerations (m/s²).

use std::f64::consts::PI;

use ped_core::{AgentId, AgentRng, Vec2};

/// Tuning knobs for all steering forces.
#[derive(Clone, Debug)]
pub struct ForceConfig {
    /// Preferred walking speed, m/s.
    pub desired_speed: f64,
    /// Seconds to converge onto the desired velocity.
    pub relaxation_time: f64,
    /// Peak repulsion from another pedestrian, m/s².
    pub social_strength: f64,
    /// Decay length of the repulsion, m.
    pub social_range: f64,
    /// Only neighbors within this radius are considered, m.
    pub neighbor_radius: f64,
    /// Magnitude of the random jitter force, m/s².
    pub random_amplitude: f64,
    /// Pull toward the group centroid once an agent strays, m/s² per metre.
    pub group_coherence_strength: f64,
    /// Damping applied when the group centroid falls behind the agent.
    pub group_gaze_strength: f64,
    /// Hard speed cap after integration, m/s.
    pub max_speed: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            desired_speed:            1.34,
            relaxation_time:          0.5,
            social_strength:          2.1,
            social_range:             0.6,
            neighbor_radius:          8.0,
            random_amplitude:         0.1,
            group_coherence_strength: 0.5,
            group_gaze_strength:      0.4,
            max_speed:                2.0,
        }
    }
}

/// Distance from the group centroid beyond which coherence starts pulling.
const COHERENCE_SLACK: f64 = 1.0;

/// Acceleration toward the current navigation target.
///
/// With no target the agent brakes to a stop over `relaxation_time`.
pub fn desired_force(
    position: Vec2,
    velocity: Vec2,
    target:   Option<Vec2>,
    config:   &ForceConfig,
) -> Vec2 {
    let desired_velocity = match target {
        Some(t) => (t - position).normalized() * config.desired_speed,
        None => Vec2::ZERO,
    };
    (desired_velocity - velocity) / config.relaxation_time
}

/// Exponential repulsion away from nearby pedestrians.
pub fn social_force(
    position:  Vec2,
    neighbors: &[(AgentId, Vec2)],
    config:    &ForceConfig,
) -> Vec2 {
    let mut force = Vec2::ZERO;
    for (_, other) in neighbors {
        let away = position - *other;
        let distance = away.length();
        if distance < f64::EPSILON {
            // coincident agents have no defined direction; skip
            continue;
        }
        let magnitude = config.social_strength * (-distance / config.social_range).exp();
        force += away.normalized() * magnitude;
    }
    force
}

/// Small uniformly-directed jitter, breaking symmetric deadlocks.
pub fn random_force(rng: &mut AgentRng, config: &ForceConfig) -> Vec2 {
    Vec2::from_polar(rng.gen_range(-PI..PI), config.random_amplitude)
}

/// Pull toward the walking group's centroid once the agent strays beyond the
/// slack distance.
pub fn group_coherence_force(
    position: Vec2,
    centroid: Option<Vec2>,
    config:   &ForceConfig,
) -> Vec2 {
    let Some(centroid) = centroid else { return Vec2::ZERO };
    let toward = centroid - position;
    if toward.length() <= COHERENCE_SLACK {
        return Vec2::ZERO;
    }
    toward * config.group_coherence_strength
}

/// Damping applied while the group centroid is behind the agent's motion —
/// the agent slows to keep companions in view.
pub fn group_gaze_force(
    position: Vec2,
    velocity: Vec2,
    centroid: Option<Vec2>,
    config:   &ForceConfig,
) -> Vec2 {
    let Some(centroid) = centroid else { return Vec2::ZERO };
    if (centroid - position).dot(velocity) >= 0.0 {
        return Vec2::ZERO;
    }
    -velocity * config.group_gaze_strength
}
