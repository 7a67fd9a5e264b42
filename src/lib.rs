pub mod config;
pub mod derive;
pub mod logging;
pub mod profile;
pub mod reactive;
pub mod session;
pub mod state;
pub mod transition;
