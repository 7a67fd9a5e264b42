//! Ownership of every task a session spawns.

use std::future::Future;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::lifetime::LifetimeHandle;

/// Registry of a session's background tasks.
///
/// Each task is raced against the session lifetime, and [`abort_all`]
/// cancels whatever is still running. Nothing spawned through the registry
/// outlives its session.
///
/// [`abort_all`]: TaskRegistry::abort_all
#[derive(Debug, Default)]
pub struct TaskRegistry {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `fut` on the current tokio runtime, cancelled when `lifetime` ends.
    pub fn spawn<F>(&self, lifetime: &LifetimeHandle, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let lifetime = lifetime.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = lifetime.wait() => {}
                _ = fut => {}
            }
        });
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Tasks that have not finished yet.
    pub fn running(&self) -> usize {
        self.handles.lock().iter().filter(|h| !h.is_finished()).count()
    }

    pub fn abort_all(&self) {
        let mut handles = self.handles.lock();
        if !handles.is_empty() {
            tracing::debug!(tasks = handles.len(), "aborting session tasks");
        }
        for handle in handles.drain(..) {
            handle.abort();
        }
    }
}
