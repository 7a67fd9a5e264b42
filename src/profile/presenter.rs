//! Turns profile screen states into view models and view commands.

use super::model::{ErrorMessageViewModel, ProfileState, ProfileViewModel};
use crate::derive::{
    ContentVisibility, Derivation, ErrorProjection, InitialLoadingIndicator, RefreshCompletion,
    ViewModelProjection,
};
use crate::reactive::{Behavior, BehaviorReader, Signal, SignalReader, Subscription};
use crate::session::LifetimeHandle;
use crate::state::ReadOnlyState;

/// What the profile view binds to.
#[derive(Debug, Clone)]
pub struct ProfilePresenterOutput {
    /// Emitted for each distinct loaded profile.
    pub view_model: SignalReader<ProfileViewModel>,
    pub content_visible: BehaviorReader<bool>,
    pub initial_loading_indicator_visible: BehaviorReader<bool>,
    /// Stop the pull-to-refresh spinner.
    pub hide_refresh_control: SignalReader<()>,
    /// `None` hides the error overlay.
    pub error_message: SignalReader<Option<ErrorMessageViewModel>>,
}

struct Sinks {
    view_model: Signal<ProfileViewModel>,
    content_visible: Behavior<bool>,
    initial_loading_indicator_visible: Behavior<bool>,
    hide_refresh_control: Signal<()>,
    error_message: Signal<Option<ErrorMessageViewModel>>,
}

struct Projections {
    view_model: ViewModelProjection<ProfileState, ProfileViewModel>,
    content_visible: ContentVisibility,
    initial_loading_indicator: InitialLoadingIndicator,
    refresh_completion: RefreshCompletion,
    error_message: ErrorProjection<ProfileState, ErrorMessageViewModel>,
}

fn view_model(state: &ProfileState) -> Option<ProfileViewModel> {
    state.data().map(ProfileViewModel::from_profile)
}

fn error_message(state: &ProfileState) -> Option<ErrorMessageViewModel> {
    state.error().map(ErrorMessageViewModel::from_error)
}

/// Feeds the profile state stream through every projection.
///
/// The presenter subscribes when it is built, so the store's replayed
/// current state is the first thing it presents. Outputs are pushed on the
/// presenter's own task; it never writes back to the store.
pub struct ProfilePresenter {
    states: Subscription<ProfileState>,
    sinks: Sinks,
    projections: Projections,
}

impl ProfilePresenter {
    /// Build the presenter over `state`.
    ///
    /// The indicator sink is seeded from the state current at build time, so
    /// its first observed value already reflects that state.
    pub fn transform(state: &ReadOnlyState<ProfileState>) -> (Self, ProfilePresenterOutput) {
        let states = state.subscribe();
        let mut initial_loading_indicator = InitialLoadingIndicator::new();
        let indicator_seed = initial_loading_indicator
            .derive(&state.read())
            .unwrap_or(false);

        let sinks = Sinks {
            view_model: Signal::new(),
            content_visible: Behavior::new(false),
            initial_loading_indicator_visible: Behavior::new(indicator_seed),
            hide_refresh_control: Signal::new(),
            error_message: Signal::new(),
        };
        let output = ProfilePresenterOutput {
            view_model: sinks.view_model.reader(),
            content_visible: sinks.content_visible.reader(),
            initial_loading_indicator_visible: sinks.initial_loading_indicator_visible.reader(),
            hide_refresh_control: sinks.hide_refresh_control.reader(),
            error_message: sinks.error_message.reader(),
        };
        let presenter = Self {
            states,
            sinks,
            projections: Projections {
                view_model: ViewModelProjection::new(view_model),
                content_visible: ContentVisibility::new(),
                initial_loading_indicator,
                refresh_completion: RefreshCompletion::new(),
                error_message: ErrorProjection::new(error_message),
            },
        };
        (presenter, output)
    }

    /// Present one state.
    pub fn present(&mut self, state: &ProfileState) {
        let p = &mut self.projections;
        if let Some(vm) = p.view_model.derive(state) {
            self.sinks.view_model.emit(vm);
        }
        if let Some(visible) = p.content_visible.derive(state) {
            self.sinks.content_visible.set_if_changed(visible);
        }
        if let Some(visible) = p.initial_loading_indicator.derive(state) {
            self.sinks.initial_loading_indicator_visible.set_if_changed(visible);
        }
        if let Some(()) = p.refresh_completion.derive(state) {
            self.sinks.hide_refresh_control.emit(());
        }
        if let Some(message) = p.error_message.derive(state) {
            self.sinks.error_message.emit(message);
        }
    }

    /// Present every state already delivered. Returns how many were presented.
    pub fn drain(&mut self) -> usize {
        let mut presented = 0;
        while let Some(state) = self.states.try_recv() {
            self.present(&state);
            presented += 1;
        }
        presented
    }

    /// Present states until the store closes or the session ends.
    pub async fn run(mut self, lifetime: LifetimeHandle) {
        loop {
            tokio::select! {
                biased;
                _ = lifetime.wait() => break,
                state = self.states.recv() => match state {
                    Some(state) => self.present(&state),
                    None => break,
                },
            }
        }
        tracing::debug!("profile presenter stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ServiceError, StubProfileService};
    use crate::state::StateStore;

    fn loaded() -> ProfileState {
        ProfileState::Loaded(StubProfileService::mocked_profile())
    }

    #[test]
    fn first_load_failure_then_success() {
        let store = StateStore::new(ProfileState::Loading);
        let (mut presenter, output) = ProfilePresenter::transform(&store.readonly());
        let mut indicator = output.initial_loading_indicator_visible.subscribe();
        let mut content = output.content_visible.subscribe();
        let mut errors = output.error_message.subscribe();
        let mut view_models = output.view_model.subscribe();

        presenter.drain();
        store.write(ProfileState::Failed(ServiceError::BadNetwork));
        presenter.drain();
        store.write(ProfileState::Loading);
        presenter.drain();
        store.write(loaded());
        presenter.drain();

        assert_eq!(indicator.drain(), vec![true, false, true, false]);
        assert_eq!(content.drain(), vec![false, true]);
        assert_eq!(
            errors.drain(),
            vec![
                None,
                Some(ErrorMessageViewModel::from_error(&ServiceError::BadNetwork)),
                None,
                None,
            ]
        );
        let vms = view_models.drain();
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].email.title, "Добавить e-mail");
    }

    #[test]
    fn indicator_starts_visible_while_loading() {
        let store = StateStore::new(ProfileState::Loading);
        let (mut presenter, output) = ProfilePresenter::transform(&store.readonly());
        let mut indicator = output.initial_loading_indicator_visible.subscribe();

        assert_eq!(indicator.try_recv(), Some(true));
        assert_eq!(presenter.drain(), 1);
        assert!(indicator.drain().is_empty());

        store.write(loaded());
        presenter.drain();
        assert_eq!(indicator.drain(), vec![false]);
    }

    #[test]
    fn indicator_starts_hidden_over_loaded_state() {
        let store = StateStore::new(loaded());
        let (_presenter, output) = ProfilePresenter::transform(&store.readonly());
        assert_eq!(output.initial_loading_indicator_visible.subscribe().drain(), vec![false]);
    }

    #[test]
    fn refresh_keeps_content_and_hides_spinner() {
        let store = StateStore::new(loaded());
        let (mut presenter, output) = ProfilePresenter::transform(&store.readonly());
        let mut hide_refresh = output.hide_refresh_control.subscribe();
        let mut view_models = output.view_model.subscribe();

        presenter.drain();
        store.write(ProfileState::Loading);
        store.write(loaded());
        assert_eq!(presenter.drain(), 2);

        assert!(output.content_visible.get());
        assert!(!output.initial_loading_indicator_visible.get());
        assert_eq!(hide_refresh.drain(), vec![()]);
        // Same profile again: no new view model.
        assert_eq!(view_models.drain().len(), 1);
    }
}
