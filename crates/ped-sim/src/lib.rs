//! `ped-sim` — tick loop orchestrator for the rust_ped crowd framework.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Queue service — each waiting queue advances its release timer;
//!                     pass permissions dispatch into queueing planners.
//!   ② Snapshot      — R-tree over agent positions + group centroids,
//!                     frozen at the start of the tick.
//!   ③ Plan & move   — per agent, ascending AgentId:
//!                       controller advances the route if the destination
//!                       completed, then yields the current target;
//!                       the integrator sums enabled forces and steps.
//! ```
//!
//! Everything is single-threaded and synchronous: events raised by queue
//! service or by position writes reach their subscribers before the next
//! statement runs.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ped_core::SimConfig;
//! use ped_scene::load_scenario;
//! use ped_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig::default();
//! let scene = load_scenario(Path::new("plaza.json"), config.seed)?;
//! let mut sim = SimBuilder::new(config, scene).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod observer;
pub mod sim;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::SimBuilder;
pub use controller::AgentController;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
