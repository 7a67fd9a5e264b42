//! Screen session lifetime and ownership.
//!
//! A session owns its store, engine, presenter and every task they spawn.
//! Nothing is shared between sessions and nothing is process-global;
//! collaborators are passed in through a dependency struct.

mod lifetime;
mod profile;
mod tasks;

pub use lifetime::{LifetimeHandle, SessionLifetime, SessionPhase};
pub use profile::{ProfileDependencies, ProfileSession, SessionError};
pub use tasks::TaskRegistry;
