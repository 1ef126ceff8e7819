//! Strongly typed identifier wrappers and the id-issuing service.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing where storage is dense, but callers should prefer the
//! `.index()` helpers for clarity.
//!
//! New IDs come from an [`IdSource`] owned by the scene and passed explicitly
//! to whatever spawns elements.  There is no process-wide counter: two scenes
//! in one process issue independent id spaces, and tests can start from a
//! fresh source without global state leaking between them.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Identity of a pedestrian agent.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identity of a waiting queue.
    pub struct QueueId(u32);
}

typed_id! {
    /// Identity of a scene waypoint.
    pub struct WaypointId(u32);
}

typed_id! {
    /// Identity of a walking group.
    pub struct GroupId(u32);
}

// ── IdSource ──────────────────────────────────────────────────────────────────

/// Issues sequential IDs for every element kind in one scene.
///
/// Each kind has its own counter so agent and queue id spaces stay dense and
/// independently indexable.
#[derive(Debug, Default)]
pub struct IdSource {
    next_agent:    u32,
    next_queue:    u32,
    next_waypoint: u32,
    next_group:    u32,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        id
    }

    pub fn next_queue_id(&mut self) -> QueueId {
        let id = QueueId(self.next_queue);
        self.next_queue += 1;
        id
    }

    pub fn next_waypoint_id(&mut self) -> WaypointId {
        let id = WaypointId(self.next_waypoint);
        self.next_waypoint += 1;
        id
    }

    pub fn next_group_id(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        id
    }

    /// Number of agent IDs issued so far.
    pub fn agent_count(&self) -> usize {
        self.next_agent as usize
    }
}
