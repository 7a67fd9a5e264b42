//! Declarative transition rules.

use std::fmt;

use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};

use crate::state::ReadOnlyState;

/// A rule the engine can merge.
///
/// Object-safe so that rules with different event and extraction types can
/// sit in one `Vec` and be handed to [`merge_all`](super::merge_all).
pub trait TransitionRule<S>: Send {
    /// Rule name, for logs.
    fn name(&self) -> &'static str;

    /// Turn the rule into a stream of candidate next states, gated by the
    /// current value of `state`.
    fn into_stream(self: Box<Self>, state: ReadOnlyState<S>) -> BoxStream<'static, S>;
}

type Guard<S, U> = Box<dyn Fn(&S) -> Option<U> + Send>;
type Effect = Box<dyn FnMut() + Send>;
type Mapping<S, E, U> = Box<dyn Fn(E, U) -> S + Send>;

/// An edge of the state machine: `events` move the machine to `map(event, u)`
/// whenever `guard` extracts some `u` from the current state.
///
/// The optional effect runs once per admitted event, before the next state
/// is produced; it is the only place a rule may perform I/O. `map` must be
/// pure.
pub struct Transition<S, E, U> {
    name: &'static str,
    events: BoxStream<'static, E>,
    step: Step<S, E, U>,
}

struct Step<S, E, U> {
    guard: Guard<S, U>,
    effect: Option<Effect>,
    map: Mapping<S, E, U>,
}

impl<S, E, U> Step<S, E, U> {
    fn admit(&mut self, name: &'static str, event: E, current: &S) -> Option<S> {
        let Some(extracted) = (self.guard)(current) else {
            tracing::trace!(rule = name, "event dropped by guard");
            return None;
        };
        if let Some(effect) = self.effect.as_mut() {
            effect();
        }
        tracing::debug!(rule = name, "transition admitted");
        Some((self.map)(event, extracted))
    }
}

impl<S, E> Transition<S, E, ()>
where
    S: 'static,
    E: 'static,
{
    /// Rule with a plain boolean guard.
    pub fn when(
        name: &'static str,
        events: impl Stream<Item = E> + Send + 'static,
        guard: impl Fn(&S) -> bool + Send + 'static,
        map: impl Fn(E) -> S + Send + 'static,
    ) -> Self {
        Self::extracting(
            name,
            events,
            move |current| guard(current).then_some(()),
            move |event, ()| map(event),
        )
    }
}

impl<S, E, U> Transition<S, E, U>
where
    S: 'static,
    E: 'static,
    U: 'static,
{
    /// Rule whose guard also extracts data from the matched state.
    pub fn extracting(
        name: &'static str,
        events: impl Stream<Item = E> + Send + 'static,
        guard: impl Fn(&S) -> Option<U> + Send + 'static,
        map: impl Fn(E, U) -> S + Send + 'static,
    ) -> Self {
        Self {
            name,
            events: events.boxed(),
            step: Step {
                guard: Box::new(guard),
                effect: None,
                map: Box::new(map),
            },
        }
    }

    /// Run `effect` for every admitted event, before the next state is emitted.
    pub fn with_effect(mut self, effect: impl FnMut() + Send + 'static) -> Self {
        self.step.effect = Some(Box::new(effect));
        self
    }

    /// Evaluate one event against `current` without going through the stream.
    pub fn admit(&mut self, event: E, current: &S) -> Option<S> {
        self.step.admit(self.name, event, current)
    }

    pub fn boxed(self) -> Box<dyn TransitionRule<S>>
    where
        S: Clone + Send,
        E: Send,
        U: Send,
    {
        Box::new(self)
    }
}

impl<S, E, U> TransitionRule<S> for Transition<S, E, U>
where
    S: Clone + Send + 'static,
    E: Send + 'static,
    U: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn into_stream(self: Box<Self>, state: ReadOnlyState<S>) -> BoxStream<'static, S> {
        let Transition {
            name,
            events,
            mut step,
        } = *self;
        events
            .filter_map(move |event| {
                let current = state.read();
                future::ready(step.admit(name, event, &current))
            })
            .boxed()
    }
}

impl<S, E, U> fmt::Debug for Transition<S, E, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("has_effect", &self.step.effect.is_some())
            .finish_non_exhaustive()
    }
}
