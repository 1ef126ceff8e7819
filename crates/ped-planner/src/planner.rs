//! The `WaypointPlanner` trait — how the movement integrator talks to
//! whatever decides where an agent walks next.

use std::rc::Rc;

use ped_scene::{Agent, Destination, Waypoint};

/// Pluggable per-agent navigation.
///
/// The movement integrator polls [`current_waypoint`][Self::current_waypoint]
/// every tick and steers toward the returned target.  Completion is split in
/// two: a *waypoint* is one leg of the plan, a *destination* is the whole
/// assignment (for a queueing planner: approach, wait, and be released).
///
/// Implementations degrade instead of failing: misuse (wrong destination
/// kind, no agent bound) is reported through the log facade and leaves the
/// planner in its prior state.
pub trait WaypointPlanner {
    /// The controlled agent, if one is bound.
    fn agent(&self) -> Option<Rc<Agent>>;

    /// Bind the controlled agent.  Planners are bound once, before the first
    /// destination is assigned.
    fn set_agent(&mut self, agent: Rc<Agent>);

    /// Assign the destination this planner should work toward.
    ///
    /// A planner accepts only the destination kind it understands; anything
    /// else is rejected with a diagnostic and no state change.
    fn set_destination(&mut self, destination: &Destination);

    /// The target the agent should currently walk toward.
    ///
    /// Advances to the next leg first if the current one is complete.
    /// `None` means the planner has nothing to offer (no destination, or
    /// misuse was rejected).
    fn current_waypoint(&mut self) -> Option<Rc<dyn Waypoint>>;

    /// Is the current leg done?  May perform the resulting phase transition
    /// as a side effect (reaching a queue's tail *is* the enqueue trigger).
    fn has_completed_waypoint(&mut self) -> bool;

    /// Is the whole assignment done?
    fn has_completed_destination(&self) -> bool;

    /// Human-readable description, for logs only.
    fn describe(&self) -> String;
}
