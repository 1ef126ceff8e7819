//! `ped-planner` — per-agent navigation planners for the `rust_ped` crowd
//! framework.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`planner`]    | `WaypointPlanner` trait                               |
//! | [`individual`] | `IndividualPlanner` — walk to a plain waypoint        |
//! | [`queueing`]   | `QueueingPlanner` — the queueing navigation state machine |
//!
//! # Control flow
//!
//! The movement integrator asks a planner "what is my current target" every
//! tick; the planner answers with an unchanged target or derives a new one.
//! Asynchronously, the queue and the agent ahead push position and permission
//! events into the planner, which updates the target without waiting for the
//! next poll.

pub mod individual;
pub mod planner;
pub mod queueing;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use individual::IndividualPlanner;
pub use planner::WaypointPlanner;
pub use queueing::{QueueingPhase, QueueingPlanner};
