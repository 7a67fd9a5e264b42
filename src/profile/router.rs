//! Navigation out of the profile screen.

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

use crate::reactive::{Signal, SignalReader};

/// Navigation requests the profile screen can make.
///
/// Implementations only navigate; they never touch the screen state.
pub trait ProfileRouting: Send + Sync {
    fn route_to_email_change(&self);

    fn route_to_email_addition(&self);

    fn route_to_orders_list(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRoute {
    EmailChange,
    EmailAddition,
    OrdersList,
}

impl fmt::Display for ProfileRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileRoute::EmailChange => "email change",
            ProfileRoute::EmailAddition => "email addition",
            ProfileRoute::OrdersList => "orders list",
        };
        f.write_str(name)
    }
}

/// Router that records every navigation request instead of navigating.
///
/// Requests are kept in order and also broadcast on a signal, so a driver
/// can react to them as they happen.
#[derive(Default)]
pub struct RecordingRouter {
    routes: Mutex<Vec<ProfileRoute>>,
    events: Signal<ProfileRoute>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<ProfileRoute> {
        self.routes.lock().clone()
    }

    pub fn events(&self) -> SignalReader<ProfileRoute> {
        self.events.reader()
    }

    fn record(&self, route: ProfileRoute) {
        tracing::info!(%route, "route requested");
        self.routes.lock().push(route);
        self.events.emit(route);
    }
}

impl ProfileRouting for RecordingRouter {
    fn route_to_email_change(&self) {
        self.record(ProfileRoute::EmailChange);
    }

    fn route_to_email_addition(&self) {
        self.record(ProfileRoute::EmailAddition);
    }

    fn route_to_orders_list(&self) {
        self.record(ProfileRoute::OrdersList);
    }
}

impl fmt::Debug for RecordingRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingRouter")
            .field("routes", &*self.routes.lock())
            .finish()
    }
}
