//! The waiting queue: an ordered line of agents with a spatial anchor,
//! facing direction, and service logic.
//!
//! # Geometry
//!
//! The *anchor* is where the head of the line stands (the service point).
//! The *direction* is the facing of queued agents, pointing from the line
//! toward the anchor.  The *end position* — where a newcomer should walk to —
//! is the anchor while the queue is empty, otherwise the position of the last
//! queued agent.
//!
//! # Events
//!
//! Two streams, consumed by queueing planners:
//!
//! - `agent_may_pass(AgentId)` — the named agent has been granted permission
//!   to leave the line.
//! - `end_position_changed(Vec2)` — the tail of the line moved (an agent
//!   joined or left, or the queue itself was relocated).
//!
//! Emission always happens after the internal state borrow is released, so
//! subscribers can query the queue from inside their callbacks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use log::debug;

use ped_core::{AgentId, QueueId, Signal, Tick, Vec2};

use crate::Agent;

/// Event streams published by a waiting queue.
#[derive(Default)]
pub struct QueueEvents {
    /// The named agent may now pass (leave the line).
    pub agent_may_pass: Signal<AgentId>,
    /// The tail of the line moved; payload is the new end position.
    pub end_position_changed: Signal<Vec2>,
}

struct QueueState {
    anchor:     Vec2,
    /// Facing of queued agents in radians, pointing toward the anchor.
    direction:  f64,
    agents:     VecDeque<Rc<Agent>>,
    /// Tick at which the current head reached the front, for service timing.
    head_since: Option<Tick>,
}

/// An ordered line of agents.  Created and destroyed by the scene; outlives
/// any individual planner bound to it.
pub struct WaitingQueue {
    id:         QueueId,
    name:       String,
    /// Service time: ticks the head waits before being released.
    wait_ticks: u64,
    state:      RefCell<QueueState>,
    events:     QueueEvents,
}

impl WaitingQueue {
    pub fn new(
        id:         QueueId,
        name:       impl Into<String>,
        anchor:     Vec2,
        direction:  f64,
        wait_ticks: u64,
    ) -> Rc<Self> {
        Rc::new(Self {
            id,
            name: name.into(),
            wait_ticks,
            state: RefCell::new(QueueState {
                anchor,
                direction,
                agents: VecDeque::new(),
                head_since: None,
            }),
            events: QueueEvents::default(),
        })
    }

    #[inline]
    pub fn id(&self) -> QueueId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the head of the line stands.
    #[inline]
    pub fn anchor_position(&self) -> Vec2 {
        self.state.borrow().anchor
    }

    /// Facing of queued agents in radians.
    #[inline]
    pub fn direction(&self) -> f64 {
        self.state.borrow().direction
    }

    /// Where a newcomer should walk to: the anchor for an empty line, else
    /// the last queued agent's position.
    pub fn end_position(&self) -> Vec2 {
        let state = self.state.borrow();
        Self::end_of(&state)
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().agents.len()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.state.borrow().agents.iter().any(|a| a.id() == agent)
    }

    pub fn events(&self) -> &QueueEvents {
        &self.events
    }

    /// Relocate the queue's anchor.
    pub fn set_position(&self, anchor: Vec2) {
        let end = {
            let mut state = self.state.borrow_mut();
            state.anchor = anchor;
            Self::end_of(&state)
        };
        self.events.end_position_changed.emit(&end);
    }

    /// Append `agent` to the line.
    ///
    /// Returns the agent immediately ahead of the newcomer, or `None` if the
    /// newcomer became the head.  The tail moved, so `end_position_changed`
    /// fires.
    pub fn enqueue(&self, agent: &Rc<Agent>) -> Option<Rc<Agent>> {
        let (ahead, end) = {
            let mut state = self.state.borrow_mut();
            let ahead = state.agents.back().cloned();
            state.agents.push_back(Rc::clone(agent));
            (ahead, Self::end_of(&state))
        };
        debug!("queue '{}': agent {} enqueued (len {})", self.name, agent.id(), self.len());
        self.events.end_position_changed.emit(&end);
        ahead
    }

    /// Pop the head of the line and grant it permission to pass.
    ///
    /// Emits `agent_may_pass` with the released agent's id, then
    /// `end_position_changed` for the shortened line.  Returns the released
    /// agent, or `None` for an empty queue.
    pub fn release_front(&self) -> Option<Rc<Agent>> {
        let (head, end) = {
            let mut state = self.state.borrow_mut();
            let head = state.agents.pop_front();
            state.head_since = None;
            (head, Self::end_of(&state))
        };
        let head = head?;
        debug!("queue '{}': agent {} may pass", self.name, head.id());
        self.events.agent_may_pass.emit(&head.id());
        self.events.end_position_changed.emit(&end);
        Some(head)
    }

    /// Advance service time.  Starts the head's wait on first sight and
    /// releases it once `wait_ticks` have elapsed.
    ///
    /// Returns the agent released this tick, if any.
    pub fn tick(&self, now: Tick) -> Option<Rc<Agent>> {
        let due = {
            let mut state = self.state.borrow_mut();
            if state.agents.is_empty() {
                state.head_since = None;
                false
            } else {
                match state.head_since {
                    None => {
                        state.head_since = Some(now);
                        false
                    }
                    Some(since) => now.since(since) >= self.wait_ticks,
                }
            }
        };
        if due { self.release_front() } else { None }
    }

    fn end_of(state: &QueueState) -> Vec2 {
        state
            .agents
            .back()
            .map(|a| a.position())
            .unwrap_or(state.anchor)
    }
}

impl fmt::Display for WaitingQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue '{}' @{} ({} waiting)", self.name, self.anchor_position(), self.len())
    }
}
