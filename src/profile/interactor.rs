//! Profile screen state machine.
//!
//! ```text
//!            pull to refresh (reload)
//!   Loaded ─────────────────────────→ Loading ←──────────── Failed
//!      ↑                               │   │   retry (reload)  ↑
//!      └──────── profile loaded ───────┘   └── load error ─────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::StreamExt;

use super::model::{Profile, ProfileState};
use super::router::ProfileRouting;
use super::service::{ProfileService, ServiceError};
use crate::reactive::Signal;
use crate::session::{LifetimeHandle, TaskRegistry};
use crate::state::ReadOnlyState;
use crate::transition::{
    filter_map_by_state, filtered_by_state, Reaction, Transition, TransitionRule,
};

/// Raw events produced by the profile view.
#[derive(Debug, Clone, Default)]
pub struct ProfileViewEvents {
    pub pull_to_refresh: Signal<()>,
    pub retry_button_tap: Signal<()>,
    pub email_update_tap: Signal<()>,
    pub my_orders_tap: Signal<()>,
}

impl ProfileViewEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Service responses, turned into events for the state machine.
#[derive(Debug, Clone, Default)]
struct ProfileResponses {
    did_load_profile: Signal<Profile>,
    profile_loading_error: Signal<ServiceError>,
}

/// Issues profile fetches for one session.
///
/// Results are not written anywhere directly: they are emitted as events
/// and go through the same guarded rules as user input. Fetches are owned by
/// the session's task registry, and a result that arrives after the session
/// ended is discarded.
#[derive(Clone)]
pub struct ProfileLoader {
    service: Arc<dyn ProfileService>,
    responses: ProfileResponses,
    tasks: Arc<TaskRegistry>,
    lifetime: LifetimeHandle,
    requests: Arc<AtomicU64>,
}

impl ProfileLoader {
    pub fn new(
        service: Arc<dyn ProfileService>,
        tasks: Arc<TaskRegistry>,
        lifetime: LifetimeHandle,
    ) -> Self {
        Self {
            service,
            responses: ProfileResponses::default(),
            tasks,
            lifetime,
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start a fetch. Must be called from within a tokio runtime.
    pub fn request(&self) {
        if self.lifetime.is_ended() {
            tracing::debug!("profile request after session end ignored");
            return;
        }
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(request, "profile request issued");

        let service = Arc::clone(&self.service);
        let responses = self.responses.clone();
        let lifetime = self.lifetime.clone();
        self.tasks.spawn(&self.lifetime, async move {
            let result = service.fetch_profile().await;
            if lifetime.is_ended() {
                return;
            }
            match result {
                Ok(profile) => responses.did_load_profile.emit(profile),
                Err(error) => {
                    tracing::warn!(request, %error, "profile request failed");
                    responses.profile_loading_error.emit(error);
                }
            }
        });
    }

    /// Number of fetches issued so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Builds the profile screen's transition rules and routing reactions.
pub struct ProfileInteractor {
    loader: ProfileLoader,
    router: Arc<dyn ProfileRouting>,
}

impl ProfileInteractor {
    pub fn new(loader: ProfileLoader, router: Arc<dyn ProfileRouting>) -> Self {
        Self { loader, router }
    }

    /// Bind the transitions between every screen state.
    pub fn transform(&self, view: &ProfileViewEvents) -> Vec<Box<dyn TransitionRule<ProfileState>>> {
        let responses = &self.loader.responses;
        vec![
            from_loaded_to_loading(view.pull_to_refresh.subscribe(), self.loader.clone()),
            from_failed_to_loading(view.retry_button_tap.subscribe(), self.loader.clone()),
            from_loading_to_failed(responses.profile_loading_error.subscribe()),
            from_loading_to_loaded(responses.did_load_profile.subscribe()),
        ]
    }

    /// Bind navigation that depends on the current state.
    pub fn routing(
        &self,
        view: &ProfileViewEvents,
        state: &ReadOnlyState<ProfileState>,
    ) -> Vec<Reaction> {
        let router = Arc::clone(&self.router);
        let email = filter_map_by_state(
            view.email_update_tap.subscribe(),
            state.clone(),
            |state: &ProfileState| state.data().map(|profile| profile.email.is_none()),
        )
        .map(move |((), email_missing)| {
            if email_missing {
                router.route_to_email_addition();
            } else {
                router.route_to_email_change();
            }
        })
        .boxed();

        let router = Arc::clone(&self.router);
        let orders = filtered_by_state(
            view.my_orders_tap.subscribe(),
            state.clone(),
            ProfileState::is_loaded,
        )
        .map(move |()| router.route_to_orders_list())
        .boxed();

        vec![email, orders]
    }
}

fn from_loaded_to_loading(
    pull_to_refresh: impl futures::Stream<Item = ()> + Send + 'static,
    loader: ProfileLoader,
) -> Box<dyn TransitionRule<ProfileState>> {
    Transition::when(
        "loaded_to_loading",
        pull_to_refresh,
        ProfileState::is_loaded,
        |()| ProfileState::Loading,
    )
    .with_effect(move || loader.request())
    .boxed()
}

fn from_failed_to_loading(
    retry_button_tap: impl futures::Stream<Item = ()> + Send + 'static,
    loader: ProfileLoader,
) -> Box<dyn TransitionRule<ProfileState>> {
    Transition::when(
        "failed_to_loading",
        retry_button_tap,
        ProfileState::is_failed,
        |()| ProfileState::Loading,
    )
    .with_effect(move || loader.request())
    .boxed()
}

fn from_loading_to_failed(
    profile_loading_error: impl futures::Stream<Item = ServiceError> + Send + 'static,
) -> Box<dyn TransitionRule<ProfileState>> {
    Transition::when(
        "loading_to_failed",
        profile_loading_error,
        ProfileState::is_loading,
        ProfileState::Failed,
    )
    .boxed()
}

fn from_loading_to_loaded(
    did_load_profile: impl futures::Stream<Item = Profile> + Send + 'static,
) -> Box<dyn TransitionRule<ProfileState>> {
    Transition::when(
        "loading_to_loaded",
        did_load_profile,
        ProfileState::is_loading,
        ProfileState::Loaded,
    )
    .boxed()
}
