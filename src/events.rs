//! Scoped change batching for stores.
//!
//! A store and its callers share a [`ChangeTracker`]. Mutations outside any
//! scope notify immediately; inside a scope they are coalesced and a single
//! notification fires when the outermost scope exits. Nesting is
//! reference-counted: an inner scope is a no-op relative to an outer one.
//!
//! [`ChangeScope`] is the RAII acquire/release pair; its `Drop` guarantees
//! release on every exit path, including early returns and error paths.
//!
//! Trackers use `Cell` interior mutability and are single-threaded by
//! construction, matching the execution model of the stores they observe.

use std::cell::Cell;
use std::rc::Rc;

/// Coalesces change notifications across nested begin/end scopes.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    depth: Cell<u32>,
    dirty: Cell<bool>,
    notifications: Cell<u64>,
}

impl ChangeTracker {
    /// Creates a tracker with no open scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a change scope. Prefer [`ChangeScope::begin`].
    pub fn begin_change(&self) {
        self.depth.set(self.depth.get() + 1);
    }

    /// Closes a change scope; fires one notification if anything changed
    /// and this was the outermost scope.
    pub fn end_change(&self) {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "end_change without matching begin_change");
        let depth = depth.saturating_sub(1);
        self.depth.set(depth);
        if depth == 0 && self.dirty.replace(false) {
            self.notifications.set(self.notifications.get() + 1);
        }
    }

    /// Records a mutation: notifies immediately outside a scope, marks the
    /// pending batch inside one.
    pub fn note_change(&self) {
        if self.depth.get() == 0 {
            self.notifications.set(self.notifications.get() + 1);
        } else {
            self.dirty.set(true);
        }
    }

    /// Whether a change scope is currently open.
    pub fn in_change_scope(&self) -> bool {
        self.depth.get() > 0
    }

    /// Total notifications fired so far.
    pub fn notifications(&self) -> u64 {
        self.notifications.get()
    }
}

/// RAII change scope: begins on construction, ends on drop.
#[must_use = "dropping the scope immediately ends the change batch"]
#[derive(Debug)]
pub struct ChangeScope {
    tracker: Rc<ChangeTracker>,
}

impl ChangeScope {
    /// Opens a scope on `tracker`.
    pub fn begin(tracker: Rc<ChangeTracker>) -> Self {
        tracker.begin_change();
        ChangeScope { tracker }
    }
}

impl Drop for ChangeScope {
    fn drop(&mut self) {
        self.tracker.end_change();
    }
}
