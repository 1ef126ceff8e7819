//! Per-agent controller: walks the route, picks the right planner for each
//! destination, and restores steering after queueing.

use std::rc::Rc;

use ped_core::{AgentRng, Vec2};
use ped_planner::{IndividualPlanner, QueueingPlanner, WaypointPlanner};
use ped_scene::{Agent, Destination, ForceKind, Waypoint};

/// Owns one agent's active planner and per-agent RNG.
///
/// When the current destination completes, the controller advances the
/// agent's route and instantiates the planner matching the next destination's
/// kind: a [`QueueingPlanner`] for queues, an [`IndividualPlanner`] for plain
/// waypoints.
///
/// The queueing planner disables social, random, and group steering on
/// enqueue but deliberately does not re-enable them; honoring that contract
/// when the agent leaves the line happens here.
pub struct AgentController {
    agent:    Rc<Agent>,
    rng:      AgentRng,
    planner:  Option<Box<dyn WaypointPlanner>>,
    /// The active destination is a queue (steering was handed to the
    /// queueing planner).
    queueing: bool,
}

impl AgentController {
    pub fn new(agent: Rc<Agent>, global_seed: u64) -> Self {
        Self {
            rng: AgentRng::new(global_seed, agent.id()),
            agent,
            planner:  None,
            queueing: false,
        }
    }

    pub fn agent(&self) -> &Rc<Agent> {
        &self.agent
    }

    pub fn rng_mut(&mut self) -> &mut AgentRng {
        &mut self.rng
    }

    /// The position the agent should walk toward this tick, advancing the
    /// route first if the current destination is complete.
    ///
    /// `None` means idle: route exhausted (or never started).
    pub fn current_target(&mut self) -> Option<Vec2> {
        let completed = match &self.planner {
            None => true,
            Some(planner) => planner.has_completed_destination(),
        };

        if completed {
            if self.queueing {
                // the queueing planner switched these off at enqueue time;
                // the agent has left the line, so steering comes back
                self.agent.enable_force(ForceKind::Social);
                self.agent.enable_force(ForceKind::Random);
                self.agent.enable_force(ForceKind::GroupCoherence);
                self.agent.enable_force(ForceKind::GroupGaze);
                self.queueing = false;
            }
            self.advance_route();
        }

        self.planner
            .as_mut()
            .and_then(|p| p.current_waypoint())
            .map(|w| w.position())
    }

    fn advance_route(&mut self) {
        match self.agent.next_destination() {
            Some(destination) => {
                let mut planner: Box<dyn WaypointPlanner> = match &destination {
                    Destination::Queue(_) => Box::new(QueueingPlanner::new()),
                    Destination::Waypoint(_) => Box::new(IndividualPlanner::new()),
                };
                planner.set_agent(Rc::clone(&self.agent));
                planner.set_destination(&destination);
                self.queueing = destination.as_queue().is_some();
                // dropping the previous planner tears down its subscriptions
                self.planner = Some(planner);
            }
            None => {
                self.planner = None;
            }
        }
    }
}
