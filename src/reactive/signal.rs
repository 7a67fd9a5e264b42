//! Fire-once event source.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::subscription::{Subscribers, Subscription};

/// Event source without replay.
///
/// Only subscribers attached at emit time see a value; late subscribers
/// start with the next emission. Every clone is an emitter. When the last
/// emitter is dropped the signal closes and all subscriptions end.
pub struct Signal<T> {
    shared: Arc<SignalShared<T>>,
}

struct SignalShared<T> {
    subscribers: Mutex<Subscribers<T>>,
    emitters: AtomicUsize,
}

/// Subscribe-only handle to a [`Signal`]. Does not keep the signal open.
pub struct SignalReader<T> {
    shared: Arc<SignalShared<T>>,
}

impl<T: Clone> Signal<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SignalShared {
                subscribers: Mutex::new(Subscribers::new()),
                emitters: AtomicUsize::new(1),
            }),
        }
    }

    pub fn emit(&self, value: T) {
        self.shared.subscribers.lock().publish(&value);
    }

    pub fn subscribe(&self) -> Subscription<T> {
        self.shared.subscribers.lock().attach(None)
    }

    pub fn reader(&self) -> SignalReader<T> {
        SignalReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }
}

impl<T: Clone> SignalReader<T> {
    pub fn subscribe(&self) -> Subscription<T> {
        self.shared.subscribers.lock().attach(None)
    }

    /// Whether every emitter has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.subscribers.lock().is_closed()
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        self.shared.emitters.fetch_add(1, Ordering::SeqCst);
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Signal<T> {
    fn drop(&mut self) {
        if self.shared.emitters.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.shared.subscribers.lock().close();
        }
    }
}

impl<T> Clone for SignalReader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("emitters", &self.shared.emitters.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for SignalReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalReader").finish_non_exhaustive()
    }
}
