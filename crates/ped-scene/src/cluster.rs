//! Bulk agent spawning from a spatial distribution.
//!
//! An `AgentCluster` describes a batch of agents sharing one spawn area and
//! one route.  `dissolve` turns the description into live agents, spreading
//! them uniformly over the configured rectangle.

use std::rc::Rc;

use ped_core::{IdSource, SimRng, Vec2};

use crate::{Agent, AgentGroup, Destination};

/// A batch description: N agents around a spawn point, sharing a route.
pub struct AgentCluster {
    position:     Vec2,
    count:        usize,
    /// Half-open uniform spread: width (x) and height (y) of the spawn
    /// rectangle.  A zero component pins that axis to the spawn point.
    distribution: Vec2,
    route:        Vec<Destination>,
    create_group: bool,
}

impl AgentCluster {
    pub fn new(position: Vec2, count: usize) -> Self {
        Self {
            position,
            count,
            distribution: Vec2::ZERO,
            route:        Vec::new(),
            create_group: false,
        }
    }

    /// Set the spawn rectangle dimensions.
    pub fn distribution(mut self, width: f64, height: f64) -> Self {
        self.distribution = Vec2::new(width, height);
        self
    }

    /// Append a destination to the shared route.
    pub fn destination(mut self, destination: Destination) -> Self {
        self.route.push(destination);
        self
    }

    /// Spawn the dissolved agents as one walking group.
    pub fn as_group(mut self, create_group: bool) -> Self {
        self.create_group = create_group;
        self
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Create and initialize the cluster's agents.
    ///
    /// Ids come from the scene's `ids` service; spawn jitter from `rng`.
    /// Returns the agents plus the walking group when one was requested.
    pub fn dissolve(
        &self,
        ids: &mut IdSource,
        rng: &mut SimRng,
    ) -> (Vec<Rc<Agent>>, Option<AgentGroup>) {
        let mut agents = Vec::with_capacity(self.count);

        for _ in 0..self.count {
            let mut spawn = self.position;
            // zero-width axes stay exact
            if self.distribution.x != 0.0 {
                let half = self.distribution.x / 2.0;
                spawn.x += rng.gen_range(-half..half);
            }
            if self.distribution.y != 0.0 {
                let half = self.distribution.y / 2.0;
                spawn.y += rng.gen_range(-half..half);
            }

            let agent = Agent::new(ids.next_agent_id(), spawn);
            for destination in &self.route {
                agent.add_destination(destination.clone());
            }
            agents.push(agent);
        }

        let group = if self.create_group && !agents.is_empty() {
            Some(AgentGroup::new(ids.next_group_id(), agents.clone()))
        } else {
            None
        };

        (agents, group)
    }
}
