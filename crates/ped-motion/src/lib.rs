//! `ped-motion` — steering forces and movement integration for the
//! `rust_ped` crowd framework.
//!
//! # Crate layout
//!
//! | Module         | Contents                                          |
//! |----------------|---------------------------------------------------|
//! | [`forces`]     | `ForceConfig` + the individual steering forces    |
//! | [`integrator`] | `Integrator` — per-agent Euler step               |
//!
//! Forces respect the per-agent [`ForceKind`][ped_scene::ForceKind] enable
//! flags: a queueing planner switches social, random, and group steering off
//! while its agent waits in line, and the integrator honors that here.

pub mod forces;
pub mod integrator;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use forces::{
    ForceConfig, desired_force, group_coherence_force, group_gaze_force, random_force,
    social_force,
};
pub use integrator::Integrator;
