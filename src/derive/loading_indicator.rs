//! Splitting "loading" into the first full-screen load and later refreshes.
//!
//! Only the very first load shows the centered indicator. Every later load
//! is a pull-to-refresh whose spinner is stopped by [`RefreshCompletion`].

use super::Derivation;
use crate::state::{GeneralizableState, LoadingIndicatable};

/// Visibility of the centered loading indicator.
///
/// Visible while the state asks for an indicator and no data has been
/// loaded yet. Once data has loaded it stays hidden for good. Only changes
/// are emitted.
#[derive(Debug, Default)]
pub struct InitialLoadingIndicator {
    initial_data_loaded: bool,
    last: Option<bool>,
}

impl InitialLoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Derivation<S> for InitialLoadingIndicator
where
    S: GeneralizableState + LoadingIndicatable,
{
    type Output = bool;

    fn derive(&mut self, state: &S) -> Option<bool> {
        if state.is_data_loaded_state() {
            self.initial_data_loaded = true;
        }
        let visible = !self.initial_data_loaded && state.should_loading_indicator_be_visible();
        if self.last == Some(visible) {
            return None;
        }
        self.last = Some(visible);
        Some(visible)
    }
}

/// Fires on every loaded state except the first.
#[derive(Debug, Default)]
pub struct RefreshCompletion {
    loads: u64,
}

impl RefreshCompletion {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: GeneralizableState> Derivation<S> for RefreshCompletion {
    type Output = ();

    fn derive(&mut self, state: &S) -> Option<()> {
        if !state.is_data_loaded_state() {
            return None;
        }
        self.loads += 1;
        (self.loads > 1).then_some(())
    }
}
