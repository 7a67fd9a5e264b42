//! Single holder of a session's current state.
//!
//! The store is a [`Behavior`] with the write half confined: whoever owns the
//! `StateStore` is the only writer (the transition engine takes it by value),
//! everybody else works with a cloneable [`ReadOnlyState`].

use std::fmt;

use crate::reactive::{Behavior, BehaviorReader, Subscription};

/// Owner of the current state.
///
/// No validation happens here; legality of a write is decided upstream by
/// transition guards.
pub struct StateStore<S> {
    current: Behavior<S>,
}

/// Snapshot and subscribe access to a [`StateStore`].
pub struct ReadOnlyState<S> {
    current: BehaviorReader<S>,
}

impl<S: Clone + fmt::Debug> StateStore<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: Behavior::new(initial),
        }
    }

    pub fn read(&self) -> S {
        self.current.get()
    }

    /// Replace the current state and notify subscribers.
    pub fn write(&self, next: S) {
        tracing::debug!(
            revision = self.current.revision() + 1,
            state = ?next,
            "state written"
        );
        self.current.set(next);
    }

    pub fn readonly(&self) -> ReadOnlyState<S> {
        ReadOnlyState {
            current: self.current.reader(),
        }
    }

    /// Number of writes since construction.
    pub fn revision(&self) -> u64 {
        self.current.revision()
    }
}

impl<S: Clone> ReadOnlyState<S> {
    /// State as of this call.
    pub fn read(&self) -> S {
        self.current.get()
    }

    /// Current state first, then every later write in order.
    pub fn subscribe(&self) -> Subscription<S> {
        self.current.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.current.revision()
    }

    /// Whether the owning store has been dropped.
    pub fn is_closed(&self) -> bool {
        self.current.is_closed()
    }
}

impl<S> Clone for ReadOnlyState<S> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for StateStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("current", &self.current)
            .finish()
    }
}

impl<S: fmt::Debug> fmt::Debug for ReadOnlyState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyState")
            .field("current", &self.current)
            .finish()
    }
}
