//! The scene: element registries and the per-tick spatial index.
//!
//! Agents, queues, and waypoints are stored densely, indexed by their typed
//! ids (the scene's own [`IdSource`] issues them sequentially, so the vectors
//! never have holes).  Iteration order is therefore ascending id — the
//! determinism anchor for the tick loop.

use std::rc::Rc;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ped_core::{AgentId, GroupId, IdSource, QueueId, SimRng, Vec2, WaypointId};

use crate::{Agent, AgentCluster, AgentGroup, AreaWaypoint, WaitingQueue, Waypoint};

// ── Scene ─────────────────────────────────────────────────────────────────────

/// Owns every simulation element and the id-issuing service.
pub struct Scene {
    agents:    Vec<Rc<Agent>>,
    queues:    Vec<Rc<WaitingQueue>>,
    waypoints: Vec<Rc<AreaWaypoint>>,
    groups:    Vec<AgentGroup>,
    ids:       IdSource,
    rng:       SimRng,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("agents", &self.agents.len())
            .field("queues", &self.queues.len())
            .field("waypoints", &self.waypoints.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

impl Scene {
    pub fn new(seed: u64) -> Self {
        Self {
            agents:    Vec::new(),
            queues:    Vec::new(),
            waypoints: Vec::new(),
            groups:    Vec::new(),
            ids:       IdSource::new(),
            rng:       SimRng::new(seed),
        }
    }

    // ── Element creation ──────────────────────────────────────────────────

    pub fn spawn_agent(&mut self, position: Vec2) -> Rc<Agent> {
        let agent = Agent::new(self.ids.next_agent_id(), position);
        self.agents.push(Rc::clone(&agent));
        agent
    }

    pub fn add_waypoint(
        &mut self,
        name: impl Into<String>,
        position: Vec2,
        radius: f64,
    ) -> Rc<AreaWaypoint> {
        let waypoint = Rc::new(AreaWaypoint::new(
            self.ids.next_waypoint_id(),
            name,
            position,
            radius,
        ));
        self.waypoints.push(Rc::clone(&waypoint));
        waypoint
    }

    pub fn add_queue(
        &mut self,
        name: impl Into<String>,
        anchor: Vec2,
        direction: f64,
        wait_ticks: u64,
    ) -> Rc<WaitingQueue> {
        let queue = WaitingQueue::new(self.ids.next_queue_id(), name, anchor, direction, wait_ticks);
        self.queues.push(Rc::clone(&queue));
        queue
    }

    /// Dissolve `cluster` into live agents registered with this scene.
    pub fn dissolve_cluster(&mut self, cluster: &AgentCluster) -> Vec<Rc<Agent>> {
        let (agents, group) = cluster.dissolve(&mut self.ids, &mut self.rng);
        self.agents.extend(agents.iter().cloned());
        if let Some(group) = group {
            self.groups.push(group);
        }
        agents
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn agent(&self, id: AgentId) -> Option<&Rc<Agent>> {
        self.agents.get(id.index())
    }

    /// All agents in ascending id order.
    pub fn agents(&self) -> &[Rc<Agent>] {
        &self.agents
    }

    pub fn queue(&self, id: QueueId) -> Option<&Rc<WaitingQueue>> {
        self.queues.get(id.index())
    }

    pub fn queues(&self) -> &[Rc<WaitingQueue>] {
        &self.queues
    }

    pub fn waypoint(&self, id: WaypointId) -> Option<&Rc<AreaWaypoint>> {
        self.waypoints.get(id.index())
    }

    pub fn waypoints(&self) -> &[Rc<AreaWaypoint>] {
        &self.waypoints
    }

    pub fn groups(&self) -> &[AgentGroup] {
        &self.groups
    }

    pub fn find_waypoint(&self, name: &str) -> Option<&Rc<AreaWaypoint>> {
        self.waypoints.iter().find(|w| w.name() == name)
    }

    pub fn find_queue(&self, name: &str) -> Option<&Rc<WaitingQueue>> {
        self.queues.iter().find(|q| q.name() == name)
    }

    /// The group `agent` belongs to, if any.
    pub fn group_of(&self, agent: AgentId) -> Option<&AgentGroup> {
        self.groups.iter().find(|g| g.contains(agent))
    }

    pub fn group(&self, id: GroupId) -> Option<&AgentGroup> {
        self.groups.get(id.index())
    }

    // ── Spatial index ─────────────────────────────────────────────────────

    /// Snapshot all agent positions into an R-tree for radius queries.
    ///
    /// Rebuilt once per tick by the sim loop; positions written later in the
    /// same tick are not reflected.  Time complexity: O(n log n).
    pub fn neighbor_index(&self) -> NeighborIndex {
        NeighborIndex::build(&self.agents)
    }
}

// ── NeighborIndex ─────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D point with the associated `AgentId`.
#[derive(Clone)]
struct AgentEntry {
    point: [f64; 2],
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A per-tick snapshot of agent positions supporting radius queries.
pub struct NeighborIndex {
    tree: RTree<AgentEntry>,
}

impl NeighborIndex {
    fn build(agents: &[Rc<Agent>]) -> Self {
        let entries: Vec<AgentEntry> = agents
            .iter()
            .map(|a| {
                let p = a.position();
                AgentEntry {
                    point: [p.x, p.y],
                    id:    a.id(),
                }
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All agents within `radius` of `center`, excluding `exclude`.
    ///
    /// Positions are the snapshot taken at build time.
    pub fn neighbors_within(
        &self,
        center:  Vec2,
        radius:  f64,
        exclude: AgentId,
    ) -> Vec<(AgentId, Vec2)> {
        self.tree
            .locate_within_distance([center.x, center.y], radius * radius)
            .filter(|e| e.id != exclude)
            .map(|e| (e.id, Vec2::new(e.point[0], e.point[1])))
            .collect()
    }
}
