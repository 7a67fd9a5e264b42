//! Profile screen feature module.
//!
//! - `model.rs` - Profile record, screen state, view models
//! - `service.rs` - Backend trait and randomized stub
//! - `interactor.rs` - Transition rules and state-dependent routing
//! - `presenter.rs` - Projections into view outputs
//! - `router.rs` - Navigation interface

mod interactor;
mod model;
mod presenter;
mod router;
mod service;

pub use interactor::{ProfileInteractor, ProfileLoader, ProfileViewEvents};
pub use model::{
    ErrorMessageViewModel, Profile, ProfileState, ProfileViewModel, TitledOptionalText, TitledText,
};
pub use presenter::{ProfilePresenter, ProfilePresenterOutput};
pub use router::{ProfileRoute, ProfileRouting, RecordingRouter};
pub use service::{ProfileService, ServiceError, StubProfileService};
