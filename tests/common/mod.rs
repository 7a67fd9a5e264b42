//! Shared test utilities and scripted collaborators.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use stateful_screen::profile::{
    Profile, ProfileService, RecordingRouter, ServiceError, StubProfileService,
};
use stateful_screen::reactive::Subscription;
use stateful_screen::session::ProfileDependencies;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Profile service that answers from a script.
///
/// Once the script is exhausted every fetch succeeds with [`profile`]. A
/// gated service holds each fetch until the test adds a permit.
pub struct ScriptedService {
    script: Mutex<VecDeque<Result<Profile, ServiceError>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedService {
    pub fn new(script: impl IntoIterator<Item = Result<Profile, ServiceError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    pub fn gated(
        script: impl IntoIterator<Item = Result<Profile, ServiceError>>,
    ) -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let service = Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
            gate: Some(Arc::clone(&gate)),
        });
        (service, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileService for ScriptedService {
    async fn fetch_profile(&self) -> Result<Profile, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            match gate.acquire().await {
                Ok(permit) => permit.forget(),
                Err(_) => return Err(ServiceError::BadNetwork),
            }
        }
        self.script.lock().pop_front().unwrap_or_else(|| Ok(profile()))
    }

    async fn update_email(&self, _new_email: String) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// The stub's mocked profile: login "iDmitriy", no e-mail.
pub fn profile() -> Profile {
    StubProfileService::mocked_profile()
}

pub fn profile_with_email(email: &str) -> Profile {
    Profile {
        email: Some(email.to_string()),
        ..profile()
    }
}

pub fn deps(service: Arc<ScriptedService>, router: Arc<RecordingRouter>) -> ProfileDependencies {
    ProfileDependencies { service, router }
}

/// Next value from `sub`, failing the test if nothing arrives in time.
pub async fn next<T: Debug>(sub: &mut Subscription<T>) -> T {
    tokio::time::timeout(RECV_TIMEOUT, sub.recv())
        .await
        .expect("timed out waiting for value")
        .expect("stream closed")
}

/// Receive from `sub` until `pred` matches, returning the matching value.
pub async fn next_matching<T: Debug>(sub: &mut Subscription<T>, pred: impl Fn(&T) -> bool) -> T {
    loop {
        let value = next(sub).await;
        if pred(&value) {
            return value;
        }
    }
}

/// Let spawned tasks run for a while.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
