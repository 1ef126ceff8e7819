//! Unit tests for ped-planner.
//!
//! Queue geometry used throughout: anchor at the origin, direction -π/2
//! (queued agents face straight down, toward the anchor), so the line grows
//! upward along +y and the personal-space offset pushes targets up by 0.7.

use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use ped_core::{AgentId, QueueId, Vec2};
use ped_scene::{Agent, Destination, ForceKind, Scene, WaitingQueue, Waypoint};

use crate::{IndividualPlanner, QueueingPhase, QueueingPlanner, WaypointPlanner};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DOWN: f64 = -FRAC_PI_2;

fn make_queue() -> Rc<WaitingQueue> {
    WaitingQueue::new(QueueId(0), "checkout", Vec2::ZERO, DOWN, 10)
}

fn make_agent(id: u32, x: f64, y: f64) -> Rc<Agent> {
    Agent::new(AgentId(id), Vec2::new(x, y))
}

fn make_planner(agent: &Rc<Agent>) -> QueueingPlanner {
    QueueingPlanner::with_agent(Rc::clone(agent))
}

fn target_position(planner: &mut QueueingPlanner) -> Vec2 {
    planner
        .current_waypoint()
        .expect("planner should have a target")
        .position()
}

fn assert_close(a: Vec2, b: Vec2) {
    assert!(a.distance(b) < 1e-9, "expected {b}, got {a}");
}

// ── Assignment ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use super::*;

    #[test]
    fn empty_queue_target_is_end_position() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 30.0);
        let mut planner = make_planner(&agent);

        planner.assign_queue(Some(Rc::clone(&queue)));

        assert_eq!(planner.phase(), QueueingPhase::Approaching);
        // empty queue: no personal-space offset, end == anchor
        assert_close(target_position(&mut planner), queue.end_position());
    }

    #[test]
    fn occupied_queue_target_is_offset_end_position() {
        let queue = make_queue();
        let occupant = make_agent(0, 0.0, 1.0);
        queue.enqueue(&occupant);

        let agent = make_agent(1, 0.0, 30.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));

        // end = occupant position; offset pushes 0.7 away from the anchor
        assert_close(target_position(&mut planner), Vec2::new(0.0, 1.7));
    }

    #[test]
    fn clearing_the_queue_resets_everything() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 30.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));
        planner.assign_queue(None);

        assert_eq!(planner.phase(), QueueingPhase::Unset);
        assert!(planner.queue().is_none());
        assert!(planner.current_waypoint().is_none());
        assert!(queue.events().agent_may_pass.is_empty());
        assert!(queue.events().end_position_changed.is_empty());
    }

    #[test]
    fn approach_target_tracks_a_growing_queue() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 30.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));

        // someone else joins: the tail moves, the approach target follows
        let newcomer = make_agent(1, 0.0, 2.4);
        queue.enqueue(&newcomer);

        assert_close(target_position(&mut planner), Vec2::new(0.0, 3.1));
        assert_eq!(planner.phase(), QueueingPhase::Approaching);
    }
}

// ── Enqueue transition ────────────────────────────────────────────────────────

#[cfg(test)]
mod enqueue {
    use super::*;

    #[test]
    fn first_query_within_radius_enqueues_as_head() {
        // anchor at the origin, agent 0.5 away from the (empty) queue's end
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 0.5);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));

        let target = target_position(&mut planner);

        assert_eq!(planner.phase(), QueueingPhase::Queued);
        assert_eq!(queue.len(), 1);
        assert!(planner.followed_agent().is_none());
        // head of the line: the target is the anchor itself
        assert_close(target, Vec2::ZERO);
    }

    #[test]
    fn repeated_queries_do_not_enqueue_twice() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 0.5);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));

        let first = target_position(&mut planner);
        // query again through both entry points, without the agent moving
        let _ = planner.has_completed_waypoint();
        let second = target_position(&mut planner);

        assert_eq!(queue.len(), 1, "no double enqueue");
        assert_close(first, second);
    }

    #[test]
    fn enqueue_behind_occupant_follows_with_personal_space() {
        let queue = make_queue();
        let occupant = make_agent(0, 0.0, 1.0);
        queue.enqueue(&occupant);

        let agent = make_agent(1, 0.0, 2.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));

        let target = target_position(&mut planner);

        assert_eq!(planner.phase(), QueueingPhase::Queued);
        assert_eq!(queue.len(), 2);
        assert_eq!(planner.followed_agent().unwrap().id(), occupant.id());
        assert_close(target, Vec2::new(0.0, 1.7));
    }

    #[test]
    fn queueing_disables_interfering_forces() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 0.5);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));
        let _ = target_position(&mut planner);

        for kind in [
            ForceKind::Social,
            ForceKind::Random,
            ForceKind::GroupCoherence,
            ForceKind::GroupGaze,
        ] {
            assert!(!agent.force_enabled(kind), "{kind} should be disabled");
        }
        assert!(agent.force_enabled(ForceKind::Desired));
    }

    #[test]
    fn approaching_agent_enqueues_when_the_tail_comes_into_range() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 4.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));
        assert_eq!(planner.phase(), QueueingPhase::Approaching);

        // a newcomer at (0, 2.5) moves the end to within 1.5 of our agent;
        // the end-position event itself triggers the transition
        let newcomer = make_agent(1, 0.0, 2.5);
        queue.enqueue(&newcomer);

        assert_eq!(planner.phase(), QueueingPhase::Queued);
        assert_eq!(planner.followed_agent().unwrap().id(), newcomer.id());
    }
}

// ── Followed-agent tracking ───────────────────────────────────────────────────

#[cfg(test)]
mod following {
    use super::*;

    /// Queue with an occupant at (0, 1); agent enqueued right behind.
    fn queued_behind_occupant() -> (Rc<WaitingQueue>, Rc<Agent>, Rc<Agent>, QueueingPlanner) {
        let queue = make_queue();
        let occupant = make_agent(0, 0.0, 1.0);
        queue.enqueue(&occupant);

        let agent = make_agent(1, 0.0, 2.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));
        let _ = target_position(&mut planner);
        assert_eq!(planner.phase(), QueueingPhase::Queued);

        (queue, occupant, agent, planner)
    }

    #[test]
    fn small_moves_are_ignored() {
        let (_queue, occupant, _agent, mut planner) = queued_behind_occupant();
        let before = target_position(&mut planner);

        occupant.set_position(Vec2::new(0.0, 0.9)); // 0.1 < 0.4

        assert_close(target_position(&mut planner), before);
    }

    #[test]
    fn large_moves_update_the_target() {
        let (_queue, occupant, _agent, mut planner) = queued_behind_occupant();

        occupant.set_position(Vec2::new(0.0, 0.5)); // 0.5 >= 0.4

        assert_close(target_position(&mut planner), Vec2::new(0.0, 1.2));
    }

    #[test]
    fn followed_agent_leaving_snaps_target_to_anchor() {
        let (queue, occupant, _agent, mut planner) = queued_behind_occupant();

        let released = queue.release_front().unwrap();
        assert_eq!(released.id(), occupant.id());

        assert!(planner.followed_agent().is_none());
        assert_close(target_position(&mut planner), queue.anchor_position());

        // stale position events from the old followed agent change nothing
        occupant.set_position(Vec2::new(50.0, 50.0));
        assert_close(target_position(&mut planner), queue.anchor_position());
        assert!(occupant.events().position_changed.is_empty());
    }
}

// ── Pass permission ───────────────────────────────────────────────────────────

#[cfg(test)]
mod pass_permission {
    use super::*;

    #[test]
    fn own_grant_completes_the_assignment() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 0.5);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));
        let before = target_position(&mut planner); // enqueues as head

        queue.release_front();

        assert_eq!(planner.phase(), QueueingPhase::MayPass);
        assert!(planner.has_completed_waypoint());
        assert!(planner.has_completed_destination());

        // the planner is inert for this queue: no event alters the target
        queue.set_position(Vec2::new(5.0, 5.0));
        assert_close(target_position(&mut planner), before);
        assert!(queue.events().agent_may_pass.is_empty());
        assert!(queue.events().end_position_changed.is_empty());
    }

    #[test]
    fn grant_for_a_stranger_changes_nothing() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 30.0);
        let planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&queue)));

        // a permission for an id we neither own nor follow
        queue.events().agent_may_pass.emit(&AgentId(99));

        assert_eq!(planner.phase(), QueueingPhase::Approaching);
    }
}

// ── Reassignment & teardown ───────────────────────────────────────────────────

#[cfg(test)]
mod reassignment {
    use super::*;

    #[test]
    fn reassignment_clears_all_prior_subscriptions() {
        let old_queue = make_queue();
        let occupant = make_agent(0, 0.0, 1.0);
        old_queue.enqueue(&occupant);

        let agent = make_agent(1, 0.0, 2.0);
        let mut planner = make_planner(&agent);
        planner.assign_queue(Some(Rc::clone(&old_queue)));
        let _ = target_position(&mut planner); // now Queued behind occupant

        let new_queue = WaitingQueue::new(QueueId(1), "tickets", Vec2::new(20.0, 0.0), DOWN, 10);
        planner.assign_queue(Some(Rc::clone(&new_queue)));

        assert_eq!(planner.phase(), QueueingPhase::Approaching);
        assert!(planner.followed_agent().is_none());
        let target = target_position(&mut planner);
        assert_close(target, new_queue.end_position());

        // stale events from the old queue and old followed agent: no effect
        occupant.set_position(Vec2::new(9.0, 9.0));
        old_queue.release_front();
        old_queue.set_position(Vec2::new(-3.0, -3.0));
        assert_close(target_position(&mut planner), target);

        assert!(old_queue.events().agent_may_pass.is_empty());
        assert!(old_queue.events().end_position_changed.is_empty());
        assert!(occupant.events().position_changed.is_empty());
    }

    #[test]
    fn dropping_the_planner_releases_subscriptions() {
        let queue = make_queue();
        let occupant = make_agent(0, 0.0, 1.0);
        queue.enqueue(&occupant);

        {
            let agent = make_agent(1, 0.0, 2.0);
            let mut planner = make_planner(&agent);
            planner.assign_queue(Some(Rc::clone(&queue)));
            let _ = target_position(&mut planner);
            assert!(!queue.events().agent_may_pass.is_empty());
            assert!(!occupant.events().position_changed.is_empty());
        }

        assert!(queue.events().agent_may_pass.is_empty());
        assert!(queue.events().end_position_changed.is_empty());
        assert!(occupant.events().position_changed.is_empty());
    }
}

// ── Misuse & missing dependencies ─────────────────────────────────────────────

#[cfg(test)]
mod misuse {
    use super::*;

    #[test]
    fn non_queue_destination_is_rejected() {
        let mut scene = Scene::new(0);
        let exit = scene.add_waypoint("exit", Vec2::new(40.0, 0.0), 2.0);

        let agent = make_agent(0, 0.0, 0.0);
        let mut planner = make_planner(&agent);
        planner.set_destination(&Destination::Waypoint(exit));

        assert_eq!(planner.phase(), QueueingPhase::Unset);
        assert!(planner.queue().is_none());
        assert!(planner.current_waypoint().is_none());
    }

    #[test]
    fn queue_destination_is_accepted() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 30.0);
        let mut planner = make_planner(&agent);
        planner.set_destination(&Destination::Queue(Rc::clone(&queue)));

        assert_eq!(planner.phase(), QueueingPhase::Approaching);
        assert!(planner.queue().is_some());
    }

    #[test]
    fn assignment_without_an_agent_is_rejected() {
        let queue = make_queue();
        let planner = QueueingPlanner::new();
        planner.assign_queue(Some(Rc::clone(&queue)));

        assert_eq!(planner.phase(), QueueingPhase::Unset);
        assert!(planner.queue().is_none());
        assert!(queue.events().agent_may_pass.is_empty());
        assert!(queue.events().end_position_changed.is_empty());
    }

    #[test]
    fn no_queue_counts_as_completed_assignment() {
        let agent = make_agent(0, 0.0, 0.0);
        let mut planner = make_planner(&agent);

        assert!(planner.has_completed_destination());
        assert!(planner.has_completed_waypoint());
        assert!(planner.current_waypoint().is_none());
    }
}

// ── IndividualPlanner ─────────────────────────────────────────────────────────

#[cfg(test)]
mod individual {
    use super::*;

    #[test]
    fn walks_to_the_waypoint_and_completes() {
        let mut scene = Scene::new(0);
        let exit = scene.add_waypoint("exit", Vec2::new(10.0, 0.0), 2.0);
        let agent = make_agent(0, 0.0, 0.0);

        let mut planner = IndividualPlanner::new();
        planner.set_agent(Rc::clone(&agent));
        planner.set_destination(&Destination::Waypoint(Rc::clone(&exit)));

        assert!(!planner.has_completed_destination());
        let target = planner.current_waypoint().unwrap();
        assert_eq!(target.position(), Vec2::new(10.0, 0.0));

        agent.set_position(Vec2::new(9.0, 0.0)); // inside the radius
        assert!(planner.has_completed_destination());
    }

    #[test]
    fn rejects_queue_destinations() {
        let queue = make_queue();
        let agent = make_agent(0, 0.0, 0.0);

        let mut planner = IndividualPlanner::new();
        planner.set_agent(agent);
        planner.set_destination(&Destination::Queue(queue));

        assert!(planner.current_waypoint().is_none());
    }
}
