//! `ped-scene` — scene elements for the `rust_ped` crowd framework.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`agent`]    | `Agent`, `AgentEvents`, `ForceKind`                       |
//! | [`waypoint`] | `Waypoint` trait, `AreaWaypoint`, `QueueingWaypoint`, `Destination` |
//! | [`queue`]    | `WaitingQueue`, `QueueEvents`                             |
//! | [`group`]    | `AgentGroup`                                              |
//! | [`cluster`]  | `AgentCluster` bulk spawner                               |
//! | [`scene`]    | `Scene` registries, `NeighborIndex` (R-tree)              |
//! | [`scenario`] | JSON scenario loading                                     |
//! | [`error`]    | `SceneError`, `SceneResult`                               |
//!
//! # Sharing model
//!
//! Elements are `Rc`-shared and single-threaded.  Mutable state sits behind
//! `RefCell`s; event signals live beside (not inside) the cells, so sources
//! always release their state borrow before notifying subscribers.

pub mod agent;
pub mod cluster;
pub mod error;
pub mod group;
pub mod queue;
pub mod scenario;
pub mod scene;
pub mod waypoint;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, AgentEvents, ForceKind};
pub use cluster::AgentCluster;
pub use error::{SceneError, SceneResult};
pub use group::AgentGroup;
pub use queue::{QueueEvents, WaitingQueue};
pub use scenario::{ScenarioSpec, build_scene, load_scenario, load_scenario_reader};
pub use scene::{NeighborIndex, Scene};
pub use waypoint::{AreaWaypoint, Destination, QueueingWaypoint, Waypoint};
