//! Planner for plain waypoint destinations: walk there, done.

use std::rc::Rc;

use log::error;

use ped_scene::{Agent, AreaWaypoint, Destination, Waypoint};

use crate::WaypointPlanner;

/// Steers an agent toward a single [`AreaWaypoint`].
///
/// The destination is complete once the agent stands inside the waypoint's
/// radius.  Queue destinations are rejected — those belong to
/// [`QueueingPlanner`][crate::QueueingPlanner].
#[derive(Default)]
pub struct IndividualPlanner {
    agent:  Option<Rc<Agent>>,
    target: Option<Rc<AreaWaypoint>>,
}

impl IndividualPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    fn reached(&self) -> bool {
        match (&self.agent, &self.target) {
            (Some(agent), Some(target)) => target.has_reached(agent.position()),
            _ => true,
        }
    }
}

impl WaypointPlanner for IndividualPlanner {
    fn agent(&self) -> Option<Rc<Agent>> {
        self.agent.clone()
    }

    fn set_agent(&mut self, agent: Rc<Agent>) {
        self.agent = Some(agent);
    }

    fn set_destination(&mut self, destination: &Destination) {
        match destination {
            Destination::Waypoint(waypoint) => self.target = Some(Rc::clone(waypoint)),
            Destination::Queue(_) => {
                error!("{destination} given to an individual planner; ignoring");
            }
        }
    }

    fn current_waypoint(&mut self) -> Option<Rc<dyn Waypoint>> {
        self.target.clone().map(|t| t as Rc<dyn Waypoint>)
    }

    fn has_completed_waypoint(&mut self) -> bool {
        self.reached()
    }

    fn has_completed_destination(&self) -> bool {
        self.reached()
    }

    fn describe(&self) -> String {
        match &self.target {
            Some(target) => format!("IndividualPlanner (waypoint '{}')", target.name()),
            None => "IndividualPlanner (no waypoint)".to_string(),
        }
    }
}
