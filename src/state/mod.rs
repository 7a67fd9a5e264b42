//! Lifecycle states and the store that holds the current one.

mod loading;
mod store;

pub use loading::{GeneralizableState, LoadingIndicatable, LoadingState, PagedLoadingState};
pub use store::{ReadOnlyState, StateStore};
