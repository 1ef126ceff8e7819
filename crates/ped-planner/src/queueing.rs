//! The queueing navigation state machine.
//!
//! Decides, moment to moment, where a queueing agent should walk while
//! approaching, waiting in, and leaving a line shared with other agents.
//! The planner reacts to three asynchronous inputs — the queue's tail moving,
//! the agent ahead moving, and pass permissions — and keeps exactly one
//! navigation target up to date for the movement integrator.
//!
//! # Phases
//!
//! | Phase         | Target                                                   |
//! |---------------|----------------------------------------------------------|
//! | `Unset`       | none — no queue assigned                                 |
//! | `Approaching` | the queue's end position, personal-space adjusted        |
//! | `Queued`      | just behind the agent ahead, or the anchor when at head  |
//! | `MayPass`     | frozen — the assignment is over, control returns to the route |
//!
//! # Event wiring
//!
//! Subscriptions are owned as [`SubscriptionId`] handles and released on
//! every teardown path (reassignment, pass grant, drop).  Callbacks capture a
//! `Weak` self-reference and use `try_borrow_mut`: an event arriving while
//! the planner is mid-transition can only be one the planner's own action
//! produced (enqueueing moves the tail), and the post-transition state
//! already accounts for it, so such events are dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, error, trace, warn};

use ped_core::{AgentId, SubscriptionId, Vec2};
use ped_scene::{Agent, Destination, ForceKind, QueueingWaypoint, WaitingQueue, Waypoint};

use crate::WaypointPlanner;

/// An agent counts as having reached the queue's tail within this distance.
const END_POSITION_RADIUS: f64 = 2.0;

/// Followed-agent moves smaller than this don't update the target
/// (suppresses oscillation from noisy forward drift).
const MIN_UPDATE_DISTANCE: f64 = 0.4;

/// Gap kept to the agent ahead, along the queue's facing direction.
const PERSONAL_SPACE_DISTANCE: f64 = 0.7;

/// The queueing planner's current stage.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum QueueingPhase {
    Unset,
    Approaching,
    Queued,
    MayPass,
}

// ── Inner state ───────────────────────────────────────────────────────────────

struct PlannerInner {
    /// For wiring event callbacks back into this cell.
    self_weak: Weak<RefCell<PlannerInner>>,

    agent:    Option<Rc<Agent>>,
    queue:    Option<Rc<WaitingQueue>>,
    /// The agent immediately ahead; only while `Queued` behind someone.
    followed: Option<Rc<Agent>>,
    phase:    QueueingPhase,
    /// The one live target.  Replaced when a phase changes its destination
    /// semantics, mutated in place otherwise.
    target:   Option<Rc<QueueingWaypoint>>,

    sub_may_pass:          Option<SubscriptionId>,
    sub_end_position:      Option<SubscriptionId>,
    sub_followed_position: Option<SubscriptionId>,
}

impl PlannerInner {
    // ── Assignment & teardown ─────────────────────────────────────────────

    fn assign_queue(&mut self, queue: Option<Rc<WaitingQueue>>) {
        if queue.is_some() && self.agent.is_none() {
            error!("cannot assign a waiting queue: no agent bound");
            return;
        }

        self.reset();
        self.queue = queue;

        if self.queue.is_some() {
            self.phase = QueueingPhase::Approaching;
            self.subscribe_queue();
            self.activate_approaching();
        }
    }

    /// Tear down the previous assignment: drop subscriptions, target, and
    /// followed agent.  The queue reference itself is overwritten by the
    /// caller.
    fn reset(&mut self) {
        self.unsubscribe_followed();
        self.unsubscribe_queue();
        self.phase = QueueingPhase::Unset;
        self.target = None;
        self.followed = None;
    }

    fn unsubscribe_queue(&mut self) {
        if let Some(queue) = &self.queue {
            if let Some(id) = self.sub_may_pass.take() {
                queue.events().agent_may_pass.disconnect(id);
            }
            if let Some(id) = self.sub_end_position.take() {
                queue.events().end_position_changed.disconnect(id);
            }
        }
    }

    fn unsubscribe_followed(&mut self) {
        if let Some(followed) = &self.followed {
            if let Some(id) = self.sub_followed_position.take() {
                followed.events().position_changed.disconnect(id);
            }
        }
    }

    fn subscribe_queue(&mut self) {
        let Some(queue) = &self.queue else { return };

        let weak = self.self_weak.clone();
        self.sub_may_pass = Some(queue.events().agent_may_pass.connect(move |id| {
            if let Some(cell) = weak.upgrade() {
                match cell.try_borrow_mut() {
                    Ok(mut planner) => planner.on_agent_may_pass(*id),
                    Err(_) => trace!("planner busy; dropped pass-permission event"),
                }
            }
        }));

        let weak = self.self_weak.clone();
        self.sub_end_position = Some(queue.events().end_position_changed.connect(move |end| {
            if let Some(cell) = weak.upgrade() {
                match cell.try_borrow_mut() {
                    Ok(mut planner) => planner.on_queue_end_position_changed(*end),
                    Err(_) => trace!("planner busy; dropped end-position event"),
                }
            }
        }));
    }

    fn subscribe_followed(&mut self, followed: &Rc<Agent>) {
        let weak = self.self_weak.clone();
        self.sub_followed_position = Some(followed.events().position_changed.connect(move |pos| {
            if let Some(cell) = weak.upgrade() {
                match cell.try_borrow_mut() {
                    Ok(mut planner) => planner.on_followed_position_changed(*pos),
                    Err(_) => trace!("planner busy; dropped followed-position event"),
                }
            }
        }));
    }

    // ── Event handlers ────────────────────────────────────────────────────

    fn on_queue_end_position_changed(&mut self, end: Vec2) {
        // there's nothing to do when the agent is already enqueued
        if self.phase != QueueingPhase::Approaching {
            return;
        }

        if self.reached_queue_end() {
            self.activate_queueing();
        } else {
            let Some(target) = &self.target else { return };

            let mut destination = end;
            if let Some(queue) = &self.queue {
                if !queue.is_empty() {
                    destination = self.with_personal_space(destination);
                }
            }
            // update in place — the approach semantics haven't changed
            target.set_position(destination);
        }
    }

    fn on_followed_position_changed(&mut self, position: Vec2) {
        let Some(target) = &self.target else {
            error!("queued agent cannot update its slot: no waypoint set");
            return;
        };

        let candidate = self.with_personal_space(position);

        // hysteresis: ignore minor forward drift of the agent ahead
        if candidate.distance(target.position()) < MIN_UPDATE_DISTANCE {
            return;
        }
        target.set_position(candidate);
    }

    fn on_agent_may_pass(&mut self, id: AgentId) {
        if self.agent.as_ref().is_some_and(|a| a.id() == id) {
            // our own grant: the personal queue interaction ends here.
            // The target stays as-is; the planner is inert for this queue,
            // so every subscription goes — a late move of the old agent
            // ahead must not rewrite a finished target.
            self.phase = QueueingPhase::MayPass;
            self.unsubscribe_followed();
            self.followed = None;
            self.unsubscribe_queue();
        } else if self.followed.as_ref().is_some_and(|f| f.id() == id) {
            self.on_followed_agent_left();
        }
    }

    fn on_followed_agent_left(&mut self) {
        self.unsubscribe_followed();
        self.followed = None;

        // Move up to the queue's front.  Deliberately no re-binding to
        // whatever agent is now ahead; see the planner docs.
        let (Some(queue), Some(target)) = (&self.queue, &self.target) else { return };
        target.set_position(queue.anchor_position());
    }

    // ── Phase activation ──────────────────────────────────────────────────

    fn activate_approaching(&mut self) {
        let (Some(agent), Some(queue)) = (self.agent.clone(), self.queue.clone()) else {
            return;
        };
        debug!("agent {} starts approaching {}", agent.id(), queue);

        self.phase = QueueingPhase::Approaching;

        let mut destination = queue.end_position();
        if !queue.is_empty() {
            destination = self.with_personal_space(destination);
        }
        self.target = Some(Rc::new(QueueingWaypoint::new(
            self.waypoint_name(&agent, &queue),
            destination,
        )));
    }

    fn activate_queueing(&mut self) {
        // A repeated completion query without intervening movement must not
        // enqueue twice.
        if self.phase == QueueingPhase::Queued {
            return;
        }
        let (Some(agent), Some(queue)) = (self.agent.clone(), self.queue.clone()) else {
            return;
        };
        debug!("agent {} enters queueing mode in {}", agent.id(), queue);

        self.phase = QueueingPhase::Queued;

        // Joining moves the tail, which re-enters this planner through its
        // own end-position subscription; the borrow guard drops that echo.
        let position = match queue.enqueue(&agent) {
            Some(ahead) => {
                let position = self.with_personal_space(ahead.position());
                self.subscribe_followed(&ahead);
                self.followed = Some(ahead);
                position
            }
            None => queue.anchor_position(),
        };

        // These steering behaviors would fight the queue-following motion.
        // Re-enabling them once the agent leaves the line is the surrounding
        // system's job.
        agent.disable_force(ForceKind::Social);
        agent.disable_force(ForceKind::Random);
        agent.disable_force(ForceKind::GroupCoherence);
        agent.disable_force(ForceKind::GroupGaze);

        self.target = Some(Rc::new(QueueingWaypoint::new(
            self.waypoint_name(&agent, &queue),
            position,
        )));
    }

    // ── Queries ───────────────────────────────────────────────────────────

    fn has_completed_waypoint(&mut self) -> bool {
        if self.target.is_none() {
            return true;
        }
        if self.phase == QueueingPhase::Approaching && self.reached_queue_end() {
            // reaching the line IS the transition; enqueue before reporting done
            self.activate_queueing();
            return true;
        }
        self.phase == QueueingPhase::MayPass
    }

    fn has_completed_destination(&self) -> bool {
        if self.queue.is_none() {
            warn!("no waiting queue assigned; treating the destination as complete");
            return true;
        }
        self.phase == QueueingPhase::MayPass
    }

    fn advance_waypoint(&mut self) {
        if self.agent.is_none() {
            error!("cannot derive a queueing waypoint without an agent");
            self.target = None;
            return;
        }
        if self.queue.is_none() {
            warn!("cannot derive a queueing waypoint without a waiting queue");
            self.target = None;
            return;
        }
        // A granted pass is terminal for this assignment: no query or event
        // yields new geometry; the last target stays untouched.
        if self.phase == QueueingPhase::MayPass {
            return;
        }

        if self.reached_queue_end() {
            self.activate_queueing();
        } else {
            self.activate_approaching();
        }
    }

    fn current_waypoint(&mut self) -> Option<Rc<QueueingWaypoint>> {
        if self.has_completed_waypoint() {
            self.advance_waypoint();
        }
        self.target.clone()
    }

    // ── Geometry helpers ──────────────────────────────────────────────────

    fn reached_queue_end(&self) -> bool {
        let (Some(agent), Some(queue)) = (&self.agent, &self.queue) else {
            return false;
        };
        queue.end_position().distance(agent.position()) <= END_POSITION_RADIUS
    }

    /// Pull `position` back by the personal-space gap, along the queue's
    /// facing direction.
    fn with_personal_space(&self, position: Vec2) -> Vec2 {
        match &self.queue {
            Some(queue) => {
                position - Vec2::from_polar(queue.direction(), PERSONAL_SPACE_DISTANCE)
            }
            None => position,
        }
    }

    fn waypoint_name(&self, agent: &Agent, queue: &WaitingQueue) -> String {
        format!("queue-slot-a{}-{}", agent.id().0, queue.name())
    }

    fn describe(&self) -> String {
        match &self.queue {
            Some(queue) => format!("QueueingPlanner ({queue})"),
            None => "QueueingPlanner (no queue)".to_string(),
        }
    }
}

impl Drop for PlannerInner {
    fn drop(&mut self) {
        // no stale callback may outlive the planner
        self.unsubscribe_followed();
        self.unsubscribe_queue();
    }
}

// ── Public handle ─────────────────────────────────────────────────────────────

/// Per-agent controller for one waiting-queue assignment.
///
/// See the module docs for the state machine.  The handle is cheap to move;
/// event callbacks hold only weak references, so dropping the planner tears
/// everything down.
pub struct QueueingPlanner {
    inner: Rc<RefCell<PlannerInner>>,
}

impl QueueingPlanner {
    pub fn new() -> Self {
        Self {
            inner: Rc::new_cyclic(|weak| {
                RefCell::new(PlannerInner {
                    self_weak:             weak.clone(),
                    agent:                 None,
                    queue:                 None,
                    followed:              None,
                    phase:                 QueueingPhase::Unset,
                    target:                None,
                    sub_may_pass:          None,
                    sub_end_position:      None,
                    sub_followed_position: None,
                })
            }),
        }
    }

    /// Convenience: construct already bound to `agent`.
    pub fn with_agent(agent: Rc<Agent>) -> Self {
        let planner = Self::new();
        planner.inner.borrow_mut().agent = Some(agent);
        planner
    }

    /// Assign (or clear, with `None`) the waiting queue.
    ///
    /// Any previous assignment is fully torn down first — subscriptions
    /// released, target discarded — before the new state is established, so
    /// stale events cannot reach the planner afterwards.
    pub fn assign_queue(&self, queue: Option<Rc<WaitingQueue>>) {
        self.inner.borrow_mut().assign_queue(queue);
    }

    /// The currently assigned queue.
    pub fn queue(&self) -> Option<Rc<WaitingQueue>> {
        self.inner.borrow().queue.clone()
    }

    /// The agent immediately ahead in the line, while following one.
    pub fn followed_agent(&self) -> Option<Rc<Agent>> {
        self.inner.borrow().followed.clone()
    }

    pub fn phase(&self) -> QueueingPhase {
        self.inner.borrow().phase
    }
}

impl Default for QueueingPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointPlanner for QueueingPlanner {
    fn agent(&self) -> Option<Rc<Agent>> {
        self.inner.borrow().agent.clone()
    }

    fn set_agent(&mut self, agent: Rc<Agent>) {
        self.inner.borrow_mut().agent = Some(agent);
    }

    fn set_destination(&mut self, destination: &Destination) {
        // capability check, resolved once here: only queues are accepted
        match destination.as_queue() {
            Some(queue) => self.assign_queue(Some(Rc::clone(queue))),
            None => error!("{destination} given to a queueing planner; ignoring"),
        }
    }

    fn current_waypoint(&mut self) -> Option<Rc<dyn Waypoint>> {
        self.inner
            .borrow_mut()
            .current_waypoint()
            .map(|t| t as Rc<dyn Waypoint>)
    }

    fn has_completed_waypoint(&mut self) -> bool {
        self.inner.borrow_mut().has_completed_waypoint()
    }

    fn has_completed_destination(&self) -> bool {
        self.inner.borrow().has_completed_destination()
    }

    fn describe(&self) -> String {
        self.inner.borrow().describe()
    }
}
