//! Navigation targets: the `Waypoint` trait, scene waypoints, and the
//! planner-driven queueing waypoint.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ped_core::{Vec2, WaypointId};

use crate::WaitingQueue;

// ── Waypoint trait ────────────────────────────────────────────────────────────

/// A named destination with a mutable position, consumed by the movement
/// integrator.
///
/// Positions are interior-mutable (`Cell<Vec2>`) so a planner can keep
/// updating a target it has already handed out, without the integrator
/// needing a mutable borrow to read it.
pub trait Waypoint {
    fn name(&self) -> &str;
    fn position(&self) -> Vec2;
    fn set_position(&self, position: Vec2);
}

// ── AreaWaypoint ──────────────────────────────────────────────────────────────

/// A fixed scene destination: a circle an agent must enter to have "arrived".
pub struct AreaWaypoint {
    id:       WaypointId,
    name:     String,
    position: Cell<Vec2>,
    radius:   f64,
}

impl AreaWaypoint {
    pub fn new(id: WaypointId, name: impl Into<String>, position: Vec2, radius: f64) -> Self {
        Self {
            id,
            name: name.into(),
            position: Cell::new(position),
            radius,
        }
    }

    #[inline]
    pub fn id(&self) -> WaypointId {
        self.id
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Has a pedestrian at `position` reached this waypoint?
    pub fn has_reached(&self, position: Vec2) -> bool {
        position.distance(self.position.get()) <= self.radius
    }
}

impl Waypoint for AreaWaypoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Vec2 {
        self.position.get()
    }

    fn set_position(&self, position: Vec2) {
        self.position.set(position);
    }
}

// ── QueueingWaypoint ──────────────────────────────────────────────────────────

/// The transient navigation target of a queueing agent.
///
/// Unlike scene waypoints this is not registered anywhere: the queueing
/// planner creates one per phase transition, drives its position from queue
/// and followed-agent events, and discards it on teardown.
pub struct QueueingWaypoint {
    name:     String,
    position: Cell<Vec2>,
}

impl QueueingWaypoint {
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name:     name.into(),
            position: Cell::new(position),
        }
    }
}

impl Waypoint for QueueingWaypoint {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Vec2 {
        self.position.get()
    }

    fn set_position(&self, position: Vec2) {
        self.position.set(position);
    }
}

// ── Destination ───────────────────────────────────────────────────────────────

/// One stop on an agent's route: either a plain waypoint or a waiting queue.
///
/// The variant is the capability check: planners match on it once at
/// assignment time instead of downcasting a generic handle at every use.
#[derive(Clone)]
pub enum Destination {
    Waypoint(Rc<AreaWaypoint>),
    Queue(Rc<WaitingQueue>),
}

impl Destination {
    /// The queue behind this destination, if it is one.
    pub fn as_queue(&self) -> Option<&Rc<WaitingQueue>> {
        match self {
            Destination::Queue(q) => Some(q),
            Destination::Waypoint(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Destination::Waypoint(w) => w.name(),
            Destination::Queue(q) => q.name(),
        }
    }

    /// The destination's reference position: waypoint center or queue anchor.
    pub fn position(&self) -> Vec2 {
        match self {
            Destination::Waypoint(w) => w.position(),
            Destination::Queue(q) => q.anchor_position(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Waypoint(w) => write!(f, "waypoint '{}'", w.name()),
            Destination::Queue(q) => write!(f, "queue '{}'", q.name()),
        }
    }
}
