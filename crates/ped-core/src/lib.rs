//! `ped-core` — foundational types for the `rust_ped` crowd simulation
//! framework.
//!
//! This crate is a dependency of every other `ped-*` crate.  It intentionally
//! has no `ped-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `QueueId`, `WaypointId`, `GroupId`, `IdSource`|
//! | [`vec2`]   | `Vec2` — 2-D point/vector math with polar construction   |
//! | [`signal`] | `Signal<T>`, `SubscriptionId` — synchronous pub/sub      |
//! | [`time`]   | `Tick`, `SimClock`, `SimConfig`                          |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (scene-level)           |
//! | [`error`]  | `PedError`, `PedResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the plain-data types.     |

pub mod error;
pub mod ids;
pub mod rng;
pub mod signal;
pub mod time;
pub mod vec2;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PedError, PedResult};
pub use ids::{AgentId, GroupId, IdSource, QueueId, WaypointId};
pub use rng::{AgentRng, SimRng};
pub use signal::{Signal, SubscriptionId};
pub use time::{SimClock, SimConfig, Tick};
pub use vec2::Vec2;
