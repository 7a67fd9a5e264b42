//! Presentation projections of the state stream.
//!
//! A derivation looks at each state in order and decides whether the view
//! needs to hear about it. Most are stateless; the few that remember
//! something (a latch, the last emitted value) keep exactly that and nothing
//! else, so they can be replayed from any state sequence in tests.

mod content;
mod loading_indicator;

pub use content::{ContentVisibility, ErrorProjection, ViewModelProjection};
pub use loading_indicator::{InitialLoadingIndicator, RefreshCompletion};

/// One step of a projection: `Some(output)` means "tell the view".
pub trait Derivation<S> {
    type Output;

    fn derive(&mut self, state: &S) -> Option<Self::Output>;
}

/// Run `derivation` over a whole state sequence, collecting every output.
pub fn replay<S, D: Derivation<S>>(derivation: &mut D, states: &[S]) -> Vec<D::Output> {
    states.iter().filter_map(|state| derivation.derive(state)).collect()
}
