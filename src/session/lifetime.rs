//! When a session is alive, and how its tasks find out it is over.
//!
//! [`SessionLifetime`] is held by the session itself; everything running on
//! the session's behalf gets a [`LifetimeHandle`] and either polls
//! [`LifetimeHandle::is_ended`] or awaits [`LifetimeHandle::wait`].

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Where a session is in its life. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionPhase {
    Built = 0,
    Active = 1,
    TornDown = 2,
}

/// Lifetime of one screen session, owned by the session.
pub struct SessionLifetime {
    ended: Arc<AtomicBool>,
    phase: AtomicU8,
    notify: Arc<Notify>,
}

impl SessionLifetime {
    pub fn new() -> Self {
        Self {
            ended: Arc::new(AtomicBool::new(false)),
            phase: AtomicU8::new(SessionPhase::Built as u8),
            notify: Arc::new(Notify::new()),
        }
    }

    /// End the session. Idempotent.
    pub fn end(&self) {
        self.advance(SessionPhase::TornDown);
        if !self.ended.swap(true, Ordering::SeqCst) {
            tracing::debug!("session lifetime ended");
            self.notify.notify_waiters();
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> SessionPhase {
        match self.phase.load(Ordering::SeqCst) {
            0 => SessionPhase::Built,
            1 => SessionPhase::Active,
            _ => SessionPhase::TornDown,
        }
    }

    /// Move to `phase`. Phases only go forward; moving back is ignored.
    pub fn advance(&self, phase: SessionPhase) {
        let previous = self.phase.fetch_max(phase as u8, Ordering::SeqCst);
        if previous < phase as u8 {
            tracing::debug!(?phase, "session phase");
        }
    }

    /// Handle for tasks that must stop with this session.
    pub fn handle(&self) -> LifetimeHandle {
        LifetimeHandle {
            ended: Arc::clone(&self.ended),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl Default for SessionLifetime {
    fn default() -> Self {
        Self::new()
    }
}

/// Task-side view of a [`SessionLifetime`]: check it or wait for the end.
#[derive(Clone, Debug)]
pub struct LifetimeHandle {
    ended: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl LifetimeHandle {
    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    pub async fn wait(&self) {
        // Enabled before the flag check so an end() in between still wakes us.
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_ended() {
            return;
        }
        notified.await;
    }
}
