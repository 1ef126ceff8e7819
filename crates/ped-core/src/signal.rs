//! Single-threaded publish/subscribe primitive.
//!
//! # Design
//!
//! A [`Signal<T>`] holds a list of subscriber callbacks.  `connect` returns an
//! opaque [`SubscriptionId`]; the subscriber owns that handle and gives it
//! back via `disconnect` on every teardown path.  Sources (queues, agents)
//! embed signals as plain fields and call `emit` after mutating their own
//! state, so subscribers observe the post-change world.
//!
//! # Dispatch semantics
//!
//! Dispatch is synchronous and in connection order.  `emit` snapshots the
//! slot list before calling out, which makes it legal for a handler to
//! disconnect any subscription — including its own — while the emit is in
//! flight.  Connections and disconnections made during an emit take effect
//! from the next emit; the in-flight snapshot is not revisited.
//!
//! `Signal` is deliberately `!Send`/`!Sync`: the simulation is cooperative
//! and single-threaded, and callbacks capture `Weak` references into
//! `RefCell`-guarded state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Opaque handle returned by [`Signal::connect`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

type Slot<T> = (SubscriptionId, Rc<dyn Fn(&T)>);

/// A multi-subscriber event stream carrying payloads of type `T`.
pub struct Signal<T> {
    slots:   RefCell<Vec<Slot<T>>>,
    next_id: Cell<u64>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots:   RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register `callback` and return the handle that removes it again.
    pub fn connect(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let callback: Rc<dyn Fn(&T)> = Rc::new(callback);
        self.slots.borrow_mut().push((id, callback));
        id
    }

    /// Remove the subscription behind `id`.
    ///
    /// Returns `false` if the handle was already disconnected (stale handles
    /// are tolerated so teardown paths can be unconditional).
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|(sid, _)| *sid != id);
        slots.len() != before
    }

    /// Synchronously invoke every connected callback with `payload`.
    pub fn emit(&self, payload: &T) {
        // Snapshot under the borrow, call outside it: handlers may connect
        // or disconnect while we iterate.
        let snapshot: Vec<Rc<dyn Fn(&T)>> = self
            .slots
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(payload);
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}
