//! Replay-latest value source.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::subscription::{Subscribers, Subscription};

/// A value that always has a current state.
///
/// New subscribers immediately receive the current value, then every
/// subsequent value in write order. Writing and fanning out happen under a
/// single lock, so a subscriber can never miss or double-see a value that
/// races with its subscription.
///
/// `Behavior` is the only handle that can write. It is not
/// `Clone`; hand out [`BehaviorReader`]s instead. Dropping the writer closes
/// every subscription.
pub struct Behavior<T> {
    shared: Arc<Mutex<BehaviorInner<T>>>,
}

struct BehaviorInner<T> {
    value: T,
    revision: u64,
    subscribers: Subscribers<T>,
}

/// Read-only handle to a [`Behavior`].
pub struct BehaviorReader<T> {
    shared: Arc<Mutex<BehaviorInner<T>>>,
}

impl<T: Clone> Behavior<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(BehaviorInner {
                value: initial,
                revision: 0,
                subscribers: Subscribers::new(),
            })),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.shared.lock().value.clone()
    }

    /// Replace the current value and notify every subscriber.
    pub fn set(&self, value: T) {
        let mut inner = self.shared.lock();
        inner.subscribers.publish(&value);
        inner.value = value;
        inner.revision += 1;
    }

    /// Like [`set`](Self::set), but skips the write when the value is unchanged.
    ///
    /// Returns whether a write happened.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        let mut inner = self.shared.lock();
        if inner.value == value {
            return false;
        }
        inner.subscribers.publish(&value);
        inner.value = value;
        inner.revision += 1;
        true
    }

    pub fn subscribe(&self) -> Subscription<T> {
        subscribe(&self.shared)
    }

    /// Number of writes since construction.
    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    pub fn reader(&self) -> BehaviorReader<T> {
        BehaviorReader {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone> BehaviorReader<T> {
    /// Current value.
    pub fn get(&self) -> T {
        self.shared.lock().value.clone()
    }

    /// Subscribe with replay of the current value.
    pub fn subscribe(&self) -> Subscription<T> {
        subscribe(&self.shared)
    }

    /// Number of writes since construction.
    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    /// Whether the writer has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().subscribers.is_closed()
    }
}

fn subscribe<T: Clone>(shared: &Mutex<BehaviorInner<T>>) -> Subscription<T> {
    let mut inner = shared.lock();
    let seed = inner.value.clone();
    inner.subscribers.attach(Some(seed))
}

impl<T> Clone for BehaviorReader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Behavior<T> {
    fn drop(&mut self) {
        self.shared.lock().subscribers.close();
    }
}

impl<T: fmt::Debug> fmt::Debug for Behavior<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("Behavior")
            .field("value", &inner.value)
            .field("revision", &inner.revision)
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for BehaviorReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("BehaviorReader")
            .field("value", &inner.value)
            .field("revision", &inner.revision)
            .finish()
    }
}
