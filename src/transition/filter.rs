//! Gating event streams by the current state.
//!
//! Each operator replaces the usual "with latest from + filter + map"
//! chain: when an event arrives, the state is read at that moment (not the
//! value seen when the stream was built) and the event is either passed on
//! or dropped.

use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};

use crate::state::ReadOnlyState;

/// Pass events through only while `predicate` accepts the current state.
pub fn filtered_by_state<E, S, P>(
    events: impl Stream<Item = E> + Send + 'static,
    state: ReadOnlyState<S>,
    predicate: P,
) -> BoxStream<'static, E>
where
    E: Send + 'static,
    S: Clone + Send + 'static,
    P: Fn(&S) -> bool + Send + 'static,
{
    filter_map_by_state(events, state, move |current| predicate(current).then_some(()))
        .map(|(event, ())| event)
        .boxed()
}

/// Pass events through while `extract` finds something in the current
/// state, pairing each event with what was extracted.
///
/// `Some(_)` plays the role of `true` in [`filtered_by_state`]; it lets a
/// consumer pull data out of the matched variant in the same step.
pub fn filter_map_by_state<E, S, U, X>(
    events: impl Stream<Item = E> + Send + 'static,
    state: ReadOnlyState<S>,
    extract: X,
) -> BoxStream<'static, (E, U)>
where
    E: Send + 'static,
    S: Clone + Send + 'static,
    U: Send + 'static,
    X: Fn(&S) -> Option<U> + Send + 'static,
{
    events
        .filter_map(move |event| {
            let current = state.read();
            future::ready(extract(&current).map(|extracted| (event, extracted)))
        })
        .boxed()
}
