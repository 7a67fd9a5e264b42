//! One profile screen instance, from construction to teardown.

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::lifetime::{SessionLifetime, SessionPhase};
use super::tasks::TaskRegistry;
use crate::config::SessionConfig;
use crate::profile::{
    ProfileInteractor, ProfileLoader, ProfilePresenter, ProfilePresenterOutput, ProfileRouting,
    ProfileService, ProfileState, ProfileViewEvents,
};
use crate::state::{ReadOnlyState, StateStore};
use crate::transition::TransitionEngine;

/// Errors from driving a session's lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session {0} is already active")]
    AlreadyActive(Uuid),

    #[error("session {0} has been torn down")]
    TornDown(Uuid),
}

/// Collaborators a profile session needs, passed in explicitly.
#[derive(Clone)]
pub struct ProfileDependencies {
    pub service: Arc<dyn ProfileService>,
    pub router: Arc<dyn ProfileRouting>,
}

/// Owner of everything one profile screen uses.
///
/// Building a session wires the store, rules and presenter but starts
/// nothing, so the view can subscribe to outputs first. [`activate`] spawns
/// the engine and presenter tasks and issues the initial load.
/// [`teardown`] (or dropping the session) ends the lifetime and aborts every
/// task, including in-flight fetches. An aborted task is dropped by the
/// runtime on a later tick, so the state stream of an active session closes
/// shortly after teardown returns, not during it.
///
/// [`activate`]: ProfileSession::activate
/// [`teardown`]: ProfileSession::teardown
pub struct ProfileSession {
    id: Uuid,
    lifetime: SessionLifetime,
    tasks: Arc<TaskRegistry>,
    state: ReadOnlyState<ProfileState>,
    output: ProfilePresenterOutput,
    loader: ProfileLoader,
    pending: Option<(TransitionEngine<ProfileState>, ProfilePresenter)>,
    initial_load: bool,
}

impl ProfileSession {
    pub fn build(
        deps: ProfileDependencies,
        view: &ProfileViewEvents,
        config: &SessionConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        let lifetime = SessionLifetime::new();
        let tasks = Arc::new(TaskRegistry::new());

        let loader = ProfileLoader::new(deps.service, Arc::clone(&tasks), lifetime.handle());
        let interactor = ProfileInteractor::new(loader.clone(), deps.router);

        let store = StateStore::new(ProfileState::Loading);
        let state = store.readonly();
        let engine = TransitionEngine::new(store, interactor.transform(view))
            .with_reactions(interactor.routing(view, &state));
        let (presenter, output) = ProfilePresenter::transform(&state);

        tracing::info!(session = %id, "profile session built");

        Self {
            id,
            lifetime,
            tasks,
            state,
            output,
            loader,
            pending: Some((engine, presenter)),
            initial_load: config.initial_load,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Read-only view of the screen state, for independent observers.
    pub fn state(&self) -> ReadOnlyState<ProfileState> {
        self.state.clone()
    }

    pub fn output(&self) -> &ProfilePresenterOutput {
        &self.output
    }

    pub fn phase(&self) -> SessionPhase {
        self.lifetime.phase()
    }

    /// Number of profile fetches this session has issued.
    pub fn request_count(&self) -> u64 {
        self.loader.request_count()
    }

    /// Start the session. Must be called from within a tokio runtime.
    pub fn activate(&mut self) -> Result<(), SessionError> {
        match self.lifetime.phase() {
            SessionPhase::Built => {}
            SessionPhase::Active => return Err(SessionError::AlreadyActive(self.id)),
            SessionPhase::TornDown => return Err(SessionError::TornDown(self.id)),
        }
        let Some((engine, presenter)) = self.pending.take() else {
            return Err(SessionError::AlreadyActive(self.id));
        };
        self.lifetime.advance(SessionPhase::Active);

        let span = tracing::info_span!("profile_session", session = %self.id);
        let handle = self.lifetime.handle();
        self.tasks
            .spawn(&handle, engine.run(handle.clone()).instrument(span.clone()));
        self.tasks
            .spawn(&handle, presenter.run(handle.clone()).instrument(span.clone()));

        let _entered = span.enter();
        tracing::info!("profile session activated");
        if self.initial_load {
            self.loader.request();
        }
        Ok(())
    }

    /// End the session and release everything it owns. Idempotent.
    ///
    /// Before activation the engine is dropped here and the state closes at
    /// once. After activation the engine lives in an aborted task, and the
    /// state closes when the runtime drops that task.
    pub fn teardown(&mut self) {
        if self.lifetime.is_ended() {
            return;
        }
        self.lifetime.end();
        self.tasks.abort_all();
        self.pending = None;
        tracing::info!(session = %self.id, "profile session torn down");
    }
}

impl Drop for ProfileSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
