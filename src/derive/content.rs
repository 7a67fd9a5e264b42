use super::Derivation;
use crate::state::GeneralizableState;

/// Projects loaded states into a view model.
///
/// Non-loaded states produce nothing, so the last good view model stays on
/// screen while reloading or showing an error. Consecutive equal view models
/// are emitted once.
pub struct ViewModelProjection<S, V> {
    project: fn(&S) -> Option<V>,
    last: Option<V>,
}

impl<S, V> ViewModelProjection<S, V> {
    pub fn new(project: fn(&S) -> Option<V>) -> Self {
        Self {
            project,
            last: None,
        }
    }
}

impl<S, V: Clone + PartialEq> Derivation<S> for ViewModelProjection<S, V> {
    type Output = V;

    fn derive(&mut self, state: &S) -> Option<V> {
        let view_model = (self.project)(state)?;
        if self.last.as_ref() == Some(&view_model) {
            return None;
        }
        self.last = Some(view_model.clone());
        Some(view_model)
    }
}

/// Content region visibility.
///
/// Hidden until the first loaded state, then latched visible for the rest
/// of the session. Emits exactly once.
#[derive(Debug, Default)]
pub struct ContentVisibility {
    shown: bool,
}

impl ContentVisibility {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: GeneralizableState> Derivation<S> for ContentVisibility {
    type Output = bool;

    fn derive(&mut self, state: &S) -> Option<bool> {
        if self.shown || !state.is_data_loaded_state() {
            return None;
        }
        self.shown = true;
        Some(true)
    }
}

/// Error overlay content.
///
/// `Some(message)` for every error state, `None` for every other state.
/// Not de-duplicated: failing twice with the same message shows the overlay
/// again after the reload in between hid it.
pub struct ErrorProjection<S, M> {
    project: fn(&S) -> Option<M>,
}

impl<S, M> ErrorProjection<S, M> {
    pub fn new(project: fn(&S) -> Option<M>) -> Self {
        Self { project }
    }
}

impl<S, M> Derivation<S> for ErrorProjection<S, M> {
    type Output = Option<M>;

    fn derive(&mut self, state: &S) -> Option<Option<M>> {
        Some((self.project)(state))
    }
}
