//! Screen lifecycle states.

/// Lifecycle of a screen that loads one payload.
///
/// Exactly one variant is active at any time; there is no combined
/// "loading with stale data" state. Data shown during a reload is kept by
/// the presentation layer, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadingState<D, E> {
    /// Waiting for the service to answer.
    Loading,
    /// Data arrived.
    Loaded(D),
    /// The last request failed.
    Failed(E),
}

impl<D, E> LoadingState<D, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Payload of the `Loaded` variant.
    pub fn data(&self) -> Option<&D> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Error of the `Failed` variant.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Variant name, for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Lifecycle of a paginated list screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PagedLoadingState<E> {
    InitialLoading,
    InitialLoaded,
    InitialFailed { error: E },
    NextPageLoading { next_page: u32 },
    NextPageLoaded,
    NextPageFailed { error: E, next_page: u32 },
}

/// Coarse classification shared by every lifecycle state type.
///
/// Derivations are written against this trait so the same projection works
/// for single-payload and paginated screens.
pub trait GeneralizableState {
    fn is_loading_state(&self) -> bool;
    fn is_data_loaded_state(&self) -> bool;
    fn is_loading_error_state(&self) -> bool;
}

/// States that know whether the full-screen loading indicator applies.
pub trait LoadingIndicatable {
    fn should_loading_indicator_be_visible(&self) -> bool;
}

impl<D, E> GeneralizableState for LoadingState<D, E> {
    fn is_loading_state(&self) -> bool {
        self.is_loading()
    }

    fn is_data_loaded_state(&self) -> bool {
        self.is_loaded()
    }

    fn is_loading_error_state(&self) -> bool {
        self.is_failed()
    }
}

impl<D, E> LoadingIndicatable for LoadingState<D, E> {
    fn should_loading_indicator_be_visible(&self) -> bool {
        self.is_loading()
    }
}

impl<E> GeneralizableState for PagedLoadingState<E> {
    fn is_loading_state(&self) -> bool {
        matches!(self, Self::InitialLoading | Self::NextPageLoading { .. })
    }

    fn is_data_loaded_state(&self) -> bool {
        matches!(self, Self::InitialLoaded | Self::NextPageLoaded)
    }

    fn is_loading_error_state(&self) -> bool {
        matches!(self, Self::InitialFailed { .. } | Self::NextPageFailed { .. })
    }
}

impl<E> LoadingIndicatable for PagedLoadingState<E> {
    // Next-page loads show an inline spinner instead.
    fn should_loading_indicator_be_visible(&self) -> bool {
        matches!(self, Self::InitialLoading)
    }
}
