//! Unit tests for ped-scene.

use std::cell::RefCell;
use std::rc::Rc;

use ped_core::{AgentId, IdSource, QueueId, SimRng, Tick, Vec2};

use crate::{Agent, AgentCluster, Destination, ForceKind, Scene, WaitingQueue};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn make_agent(id: u32, x: f64, y: f64) -> Rc<Agent> {
    Agent::new(AgentId(id), Vec2::new(x, y))
}

fn make_queue(anchor: Vec2, direction: f64) -> Rc<WaitingQueue> {
    WaitingQueue::new(QueueId(0), "checkout", anchor, direction, 10)
}

// ── Agent ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod agent_tests {
    use super::*;

    #[test]
    fn set_position_emits_after_write() {
        let agent = make_agent(0, 0.0, 0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let agent2 = Rc::clone(&agent);
        let seen2 = Rc::clone(&seen);
        agent.events().position_changed.connect(move |p| {
            // the handler observes the post-write state
            assert_eq!(agent2.position(), *p);
            seen2.borrow_mut().push(*p);
        });

        agent.set_position(Vec2::new(1.0, 2.0));
        assert_eq!(*seen.borrow(), vec![Vec2::new(1.0, 2.0)]);
    }

    #[test]
    fn force_flags_default_enabled() {
        let agent = make_agent(0, 0.0, 0.0);
        assert!(agent.force_enabled(ForceKind::Social));
        agent.disable_force(ForceKind::Social);
        agent.disable_force(ForceKind::Random);
        assert!(!agent.force_enabled(ForceKind::Social));
        assert!(!agent.force_enabled(ForceKind::Random));
        assert!(agent.force_enabled(ForceKind::Desired));
        agent.enable_force(ForceKind::Social);
        assert!(agent.force_enabled(ForceKind::Social));
        assert!(!agent.force_enabled(ForceKind::Random));
    }

    #[test]
    fn force_kind_name_roundtrip() {
        for kind in [
            ForceKind::Desired,
            ForceKind::Social,
            ForceKind::Random,
            ForceKind::GroupCoherence,
            ForceKind::GroupGaze,
        ] {
            assert_eq!(kind.to_string().parse::<ForceKind>().unwrap(), kind);
        }
        assert!("teleport".parse::<ForceKind>().is_err());
    }

    #[test]
    fn route_advances_once_per_call() {
        let mut scene = Scene::new(0);
        let wp_a = scene.add_waypoint("a", Vec2::new(1.0, 0.0), 1.0);
        let wp_b = scene.add_waypoint("b", Vec2::new(2.0, 0.0), 1.0);

        let agent = make_agent(0, 0.0, 0.0);
        agent.add_destination(Destination::Waypoint(wp_a));
        agent.add_destination(Destination::Waypoint(wp_b));

        assert_eq!(agent.remaining_destinations(), 2);
        assert_eq!(agent.next_destination().unwrap().name(), "a");
        assert_eq!(agent.next_destination().unwrap().name(), "b");
        assert!(agent.next_destination().is_none());
    }
}

// ── WaitingQueue ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue_tests {
    use super::*;

    #[test]
    fn end_position_is_anchor_when_empty() {
        let queue = make_queue(Vec2::new(5.0, 0.0), 0.0);
        assert!(queue.is_empty());
        assert_eq!(queue.end_position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn end_position_tracks_last_agent() {
        let queue = make_queue(Vec2::ZERO, 0.0);
        let first = make_agent(0, 1.0, 0.0);
        let second = make_agent(1, 2.5, 0.0);

        assert!(queue.enqueue(&first).is_none(), "first agent becomes the head");
        let ahead = queue.enqueue(&second).expect("second agent follows the first");
        assert_eq!(ahead.id(), AgentId(0));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.end_position(), Vec2::new(2.5, 0.0));
    }

    #[test]
    fn enqueue_emits_end_position_changed() {
        let queue = make_queue(Vec2::ZERO, 0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = Rc::clone(&seen);
        queue.events().end_position_changed.connect(move |p| seen2.borrow_mut().push(*p));

        let agent = make_agent(0, 3.0, 1.0);
        queue.enqueue(&agent);
        assert_eq!(*seen.borrow(), vec![Vec2::new(3.0, 1.0)]);
    }

    #[test]
    fn release_front_emits_pass_then_end() {
        let queue = make_queue(Vec2::ZERO, 0.0);
        let head = make_agent(0, 1.0, 0.0);
        let tail = make_agent(1, 2.0, 0.0);
        queue.enqueue(&head);
        queue.enqueue(&tail);

        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = Rc::clone(&order);
        queue.events().agent_may_pass.connect(move |id| o1.borrow_mut().push(format!("pass:{}", id.0)));
        let o2 = Rc::clone(&order);
        queue.events().end_position_changed.connect(move |_| o2.borrow_mut().push("end".into()));

        let released = queue.release_front().expect("head released");
        assert_eq!(released.id(), AgentId(0));
        assert_eq!(*order.borrow(), vec!["pass:0".to_string(), "end".to_string()]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn service_releases_head_after_wait() {
        let queue = make_queue(Vec2::ZERO, 0.0);
        let agent = make_agent(0, 0.5, 0.0);
        queue.enqueue(&agent);

        // tick 0 starts the wait; release is due wait_ticks later
        assert!(queue.tick(Tick(0)).is_none());
        assert!(queue.tick(Tick(9)).is_none());
        let released = queue.tick(Tick(10)).expect("wait elapsed");
        assert_eq!(released.id(), AgentId(0));
        assert!(queue.is_empty());
        // an empty queue keeps idling
        assert!(queue.tick(Tick(11)).is_none());
    }

    #[test]
    fn set_position_moves_empty_queue_end() {
        let queue = make_queue(Vec2::ZERO, 0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = Rc::clone(&seen);
        queue.events().end_position_changed.connect(move |p| seen2.borrow_mut().push(*p));

        queue.set_position(Vec2::new(0.0, 4.0));
        assert_eq!(queue.anchor_position(), Vec2::new(0.0, 4.0));
        assert_eq!(*seen.borrow(), vec![Vec2::new(0.0, 4.0)]);
    }
}

// ── AgentCluster ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cluster_tests {
    use super::*;

    #[test]
    fn dissolve_spawns_count_agents_within_spread() {
        let cluster = AgentCluster::new(Vec2::new(10.0, -5.0), 20).distribution(4.0, 2.0);
        let mut ids = IdSource::new();
        let mut rng = SimRng::new(7);

        let (agents, group) = cluster.dissolve(&mut ids, &mut rng);
        assert_eq!(agents.len(), 20);
        assert!(group.is_none());
        for agent in &agents {
            let p = agent.position();
            assert!((p.x - 10.0).abs() <= 2.0, "x out of spread: {p}");
            assert!((p.y + 5.0).abs() <= 1.0, "y out of spread: {p}");
        }
    }

    #[test]
    fn zero_spread_pins_spawn_point() {
        let cluster = AgentCluster::new(Vec2::new(1.0, 2.0), 3);
        let mut ids = IdSource::new();
        let mut rng = SimRng::new(0);
        let (agents, _) = cluster.dissolve(&mut ids, &mut rng);
        for agent in &agents {
            assert_eq!(agent.position(), Vec2::new(1.0, 2.0));
        }
    }

    #[test]
    fn route_and_group_propagate() {
        let mut scene = Scene::new(0);
        let exit = scene.add_waypoint("exit", Vec2::new(40.0, 0.0), 2.0);

        let cluster = AgentCluster::new(Vec2::ZERO, 4)
            .destination(Destination::Waypoint(exit))
            .as_group(true);
        let agents = scene.dissolve_cluster(&cluster);

        assert_eq!(agents.len(), 4);
        assert_eq!(scene.groups().len(), 1);
        for agent in &agents {
            assert_eq!(agent.remaining_destinations(), 1);
            assert!(scene.group_of(agent.id()).is_some());
        }
        let centroid = scene.groups()[0].centroid().unwrap();
        assert_eq!(centroid, Vec2::ZERO);
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scene_tests {
    use super::*;

    #[test]
    fn dense_id_lookup() {
        let mut scene = Scene::new(0);
        let a = scene.spawn_agent(Vec2::ZERO);
        let b = scene.spawn_agent(Vec2::new(1.0, 0.0));
        assert_eq!(a.id(), AgentId(0));
        assert_eq!(b.id(), AgentId(1));
        assert!(Rc::ptr_eq(scene.agent(AgentId(1)).unwrap(), &b));
    }

    #[test]
    fn find_by_name() {
        let mut scene = Scene::new(0);
        scene.add_waypoint("exit", Vec2::ZERO, 1.0);
        scene.add_queue("checkout", Vec2::ZERO, 0.0, 10);
        assert!(scene.find_waypoint("exit").is_some());
        assert!(scene.find_queue("checkout").is_some());
        assert!(scene.find_waypoint("checkout").is_none());
    }

    #[test]
    fn neighbor_index_radius_query() {
        let mut scene = Scene::new(0);
        let center = scene.spawn_agent(Vec2::ZERO);
        scene.spawn_agent(Vec2::new(1.0, 0.0));
        scene.spawn_agent(Vec2::new(0.0, 2.0));
        scene.spawn_agent(Vec2::new(50.0, 0.0));

        let index = scene.neighbor_index();
        let mut near = index.neighbors_within(Vec2::ZERO, 3.0, center.id());
        near.sort_by_key(|(id, _)| *id);

        let ids: Vec<u32> = near.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![1, 2], "excludes self and the far agent");
    }

    #[test]
    fn neighbor_index_is_a_snapshot() {
        let mut scene = Scene::new(0);
        let mover = scene.spawn_agent(Vec2::ZERO);
        let probe = scene.spawn_agent(Vec2::new(100.0, 0.0));

        let index = scene.neighbor_index();
        mover.set_position(Vec2::new(100.0, 0.0));
        // the index still sees the build-time position
        assert!(index.neighbors_within(Vec2::new(100.0, 0.0), 1.0, probe.id()).is_empty());
    }
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use std::io::Cursor;

    use crate::{SceneError, load_scenario_reader};

    use super::*;

    const SCENARIO_JSON: &str = r#"{
        "waypoints": [
            { "name": "exit", "x": 40.0, "y": 0.0, "radius": 2.0 }
        ],
        "queues": [
            { "name": "checkout", "x": 10.0, "y": 0.0, "direction_deg": 180.0, "wait_ticks": 40 }
        ],
        "clusters": [
            { "x": -20.0, "y": 0.0, "count": 6, "spread_x": 4.0, "spread_y": 4.0,
              "route": ["checkout", "exit"] }
        ]
    }"#;

    #[test]
    fn loads_full_scene() {
        let scene = load_scenario_reader(Cursor::new(SCENARIO_JSON), 42).unwrap();
        assert_eq!(scene.agents().len(), 6);
        assert_eq!(scene.queues().len(), 1);
        assert_eq!(scene.waypoints().len(), 1);

        let queue = scene.find_queue("checkout").unwrap();
        assert_eq!(queue.anchor_position(), Vec2::new(10.0, 0.0));
        assert!((queue.direction() - std::f64::consts::PI).abs() < 1e-12);

        // every agent got the two-stop route, queue first
        for agent in scene.agents() {
            assert_eq!(agent.remaining_destinations(), 2);
            let first = agent.next_destination().unwrap();
            assert!(first.as_queue().is_some());
        }
    }

    #[test]
    fn unknown_route_name_fails() {
        let json = r#"{ "clusters": [ { "x": 0, "y": 0, "count": 1, "route": ["nowhere"] } ] }"#;
        let err = load_scenario_reader(Cursor::new(json), 0).unwrap_err();
        assert!(matches!(err, SceneError::UnknownDestination(name) if name == "nowhere"));
    }

    #[test]
    fn malformed_json_fails_with_parse_error() {
        let err = load_scenario_reader(Cursor::new("{ not json"), 0).unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }
}
