//! Walking groups: small sets of agents that try to stay together.
//!
//! Groups only matter to the group-coherence and group-gaze steering forces;
//! queueing suspends both.

use std::rc::Rc;

use ped_core::{AgentId, GroupId, Vec2};

use crate::Agent;

/// A set of agents walking together.
pub struct AgentGroup {
    id:      GroupId,
    members: Vec<Rc<Agent>>,
}

impl AgentGroup {
    pub fn new(id: GroupId, members: Vec<Rc<Agent>>) -> Self {
        Self { id, members }
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn members(&self) -> &[Rc<Agent>] {
        &self.members
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.iter().any(|a| a.id() == agent)
    }

    /// Mean position of all members; `None` for an empty group.
    pub fn centroid(&self) -> Option<Vec2> {
        if self.members.is_empty() {
            return None;
        }
        let sum = self
            .members
            .iter()
            .fold(Vec2::ZERO, |acc, a| acc + a.position());
        Some(sum / self.members.len() as f64)
    }
}
