//! The pedestrian agent: position, velocity, steering flags, and route.
//!
//! Agents are shared via `Rc` between the scene, queues, and planners.
//! Mutable state sits behind a `RefCell`; the event signals live outside it,
//! so an emission never holds the state borrow and subscribers are free to
//! read the agent from inside their callbacks.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use ped_core::{AgentId, Signal, Vec2};

use crate::Destination;

// ── ForceKind ─────────────────────────────────────────────────────────────────

/// The steering behaviors acting on an agent, each individually switchable.
///
/// A queueing agent gets `Social`, `Random`, `GroupCoherence`, and
/// `GroupGaze` disabled for the duration of queueing so they cannot fight the
/// queue-following motion.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ForceKind {
    Desired,
    Social,
    Random,
    GroupCoherence,
    GroupGaze,
}

impl ForceKind {
    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for ForceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForceKind::Desired        => "desired",
            ForceKind::Social         => "social",
            ForceKind::Random         => "random",
            ForceKind::GroupCoherence => "group-coherence",
            ForceKind::GroupGaze      => "group-gaze",
        };
        f.write_str(name)
    }
}

impl FromStr for ForceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desired"         => Ok(ForceKind::Desired),
            "social"          => Ok(ForceKind::Social),
            "random"          => Ok(ForceKind::Random),
            "group-coherence" => Ok(ForceKind::GroupCoherence),
            "group-gaze"      => Ok(ForceKind::GroupGaze),
            other             => Err(format!("unknown force kind '{other}'")),
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// Event streams published by an agent.
#[derive(Default)]
pub struct AgentEvents {
    /// Emitted after every position write, with the new position.
    pub position_changed: Signal<Vec2>,
}

struct AgentState {
    position:        Vec2,
    velocity:        Vec2,
    route:           Vec<Destination>,
    next_destination: usize,
    /// Bitmask of disabled [`ForceKind`]s.
    disabled_forces: u8,
}

/// A single pedestrian.
pub struct Agent {
    id:     AgentId,
    state:  RefCell<AgentState>,
    events: AgentEvents,
}

impl Agent {
    pub fn new(id: AgentId, position: Vec2) -> Rc<Self> {
        Rc::new(Self {
            id,
            state: RefCell::new(AgentState {
                position,
                velocity:         Vec2::ZERO,
                route:            Vec::new(),
                next_destination: 0,
                disabled_forces:  0,
            }),
            events: AgentEvents::default(),
        })
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.state.borrow().position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.state.borrow().velocity
    }

    pub fn set_velocity(&self, velocity: Vec2) {
        self.state.borrow_mut().velocity = velocity;
    }

    /// Move the agent and notify subscribers.
    ///
    /// The state borrow is released before the emit, so handlers may read
    /// this agent (or any other) synchronously.
    pub fn set_position(&self, position: Vec2) {
        self.state.borrow_mut().position = position;
        self.events.position_changed.emit(&position);
    }

    pub fn events(&self) -> &AgentEvents {
        &self.events
    }

    // ── Steering flags ────────────────────────────────────────────────────

    pub fn disable_force(&self, kind: ForceKind) {
        self.state.borrow_mut().disabled_forces |= kind.bit();
    }

    pub fn enable_force(&self, kind: ForceKind) {
        self.state.borrow_mut().disabled_forces &= !kind.bit();
    }

    #[inline]
    pub fn force_enabled(&self, kind: ForceKind) -> bool {
        self.state.borrow().disabled_forces & kind.bit() == 0
    }

    // ── Route ─────────────────────────────────────────────────────────────

    /// Append a destination to the agent's route.
    pub fn add_destination(&self, destination: Destination) {
        self.state.borrow_mut().route.push(destination);
    }

    /// Take the next un-visited destination, advancing the route cursor.
    ///
    /// Returns `None` once the route is exhausted; the agent then idles.
    pub fn next_destination(&self) -> Option<Destination> {
        let mut state = self.state.borrow_mut();
        let dest = state.route.get(state.next_destination).cloned()?;
        state.next_destination += 1;
        Some(dest)
    }

    /// Number of destinations remaining on the route.
    pub fn remaining_destinations(&self) -> usize {
        let state = self.state.borrow();
        state.route.len() - state.next_destination
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent {} @{}", self.id.0, self.position())
    }
}
