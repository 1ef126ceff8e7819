//! JSON scenario loader.
//!
//! # Format
//!
//! One document describes a whole scene: named waypoints, named queues, and
//! agent clusters whose `route` lists refer to those names.
//!
//! ```json
//! {
//!   "waypoints": [
//!     { "name": "exit", "x": 40.0, "y": 0.0, "radius": 2.0 }
//!   ],
//!   "queues": [
//!     { "name": "checkout", "x": 10.0, "y": 0.0, "direction_deg": 180.0, "wait_ticks": 40 }
//!   ],
//!   "clusters": [
//!     { "x": -20.0, "y": 0.0, "count": 6, "spread_x": 4.0, "spread_y": 4.0,
//!       "group": false, "route": ["checkout", "exit"] }
//!   ]
//! }
//! ```
//!
//! Route names resolve against waypoints first, then queues; an unresolved
//! name fails the whole load.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use ped_core::Vec2;

use crate::{AgentCluster, Destination, Scene, SceneError, SceneResult};

// ── Spec records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ScenarioSpec {
    #[serde(default)]
    pub waypoints: Vec<WaypointSpec>,
    #[serde(default)]
    pub queues:    Vec<QueueSpec>,
    #[serde(default)]
    pub clusters:  Vec<ClusterSpec>,
}

#[derive(Deserialize)]
pub struct WaypointSpec {
    pub name:   String,
    pub x:      f64,
    pub y:      f64,
    pub radius: f64,
}

#[derive(Deserialize)]
pub struct QueueSpec {
    pub name:          String,
    pub x:             f64,
    pub y:             f64,
    /// Facing of queued agents in degrees, pointing toward the anchor.
    pub direction_deg: f64,
    pub wait_ticks:    u64,
}

#[derive(Deserialize)]
pub struct ClusterSpec {
    pub x:     f64,
    pub y:     f64,
    pub count: usize,
    #[serde(default)]
    pub spread_x: f64,
    #[serde(default)]
    pub spread_y: f64,
    #[serde(default)]
    pub group: bool,
    #[serde(default)]
    pub route: Vec<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a scene from a JSON scenario file.
pub fn load_scenario(path: &Path, seed: u64) -> SceneResult<Scene> {
    let file = std::fs::File::open(path)?;
    load_scenario_reader(file, seed)
}

/// Like [`load_scenario`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded scenario text.
pub fn load_scenario_reader<R: Read>(reader: R, seed: u64) -> SceneResult<Scene> {
    let spec: ScenarioSpec = serde_json::from_reader(reader)?;
    build_scene(&spec, seed)
}

/// Build a scene from an already-parsed spec.
pub fn build_scene(spec: &ScenarioSpec, seed: u64) -> SceneResult<Scene> {
    let mut scene = Scene::new(seed);

    // ── Named elements first, so routes can refer to them ─────────────────
    let mut destinations: FxHashMap<&str, Destination> = FxHashMap::default();

    for w in &spec.waypoints {
        let waypoint = scene.add_waypoint(&w.name, Vec2::new(w.x, w.y), w.radius);
        destinations.insert(w.name.as_str(), Destination::Waypoint(waypoint));
    }

    for q in &spec.queues {
        let queue = scene.add_queue(
            &q.name,
            Vec2::new(q.x, q.y),
            q.direction_deg.to_radians(),
            q.wait_ticks,
        );
        destinations
            .entry(q.name.as_str())
            .or_insert(Destination::Queue(queue));
    }

    // ── Clusters ──────────────────────────────────────────────────────────
    for c in &spec.clusters {
        let mut cluster = AgentCluster::new(Vec2::new(c.x, c.y), c.count)
            .distribution(c.spread_x, c.spread_y)
            .as_group(c.group);

        for name in &c.route {
            let destination = destinations
                .get(name.as_str())
                .ok_or_else(|| SceneError::UnknownDestination(name.clone()))?;
            cluster = cluster.destination(destination.clone());
        }

        scene.dissolve_cluster(&cluster);
    }

    Ok(scene)
}
