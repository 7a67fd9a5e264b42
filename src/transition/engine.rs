//! Merging rules and closing the loop back into the store.

use std::fmt;

use futures::stream::{self, BoxStream, SelectAll, StreamExt};
use futures::FutureExt;

use super::rule::TransitionRule;
use crate::session::LifetimeHandle;
use crate::state::{ReadOnlyState, StateStore};

/// A guarded event handler that produces no state, e.g. a routing binding.
pub type Reaction = BoxStream<'static, ()>;

/// Merge the output streams of `rules` into one stream of candidate states.
///
/// Values come out in the order the merged stream yields them; there is no
/// priority between rules. Guards partition by state variant, so at most one
/// rule can match a given state anyway.
pub fn merge_all<S>(
    rules: Vec<Box<dyn TransitionRule<S>>>,
    state: &ReadOnlyState<S>,
) -> SelectAll<BoxStream<'static, S>>
where
    S: Clone + Send + 'static,
{
    let names: Vec<&'static str> = rules.iter().map(|rule| rule.name()).collect();
    tracing::debug!(rules = ?names, "merging transition rules");
    stream::select_all(rules.into_iter().map(|rule| rule.into_stream(state.clone())))
}

/// Drives a set of transition rules against one store.
///
/// The engine owns the [`StateStore`], which makes it the only writer.
/// Reactions are driven on the same timeline, so they observe the state as
/// of their own arrival. Dropping the engine drops the store and ends every
/// subscription to it.
pub struct TransitionEngine<S> {
    store: StateStore<S>,
    steps: SelectAll<BoxStream<'static, Option<S>>>,
}

impl<S> TransitionEngine<S>
where
    S: Clone + Send + fmt::Debug + 'static,
{
    pub fn new(store: StateStore<S>, rules: Vec<Box<dyn TransitionRule<S>>>) -> Self {
        let transitions = merge_all(rules, &store.readonly()).map(Some).boxed();
        Self {
            store,
            steps: stream::select_all([transitions]),
        }
    }

    /// Also drive `reactions` on this engine's timeline.
    pub fn with_reactions(mut self, reactions: Vec<Reaction>) -> Self {
        for reaction in reactions {
            self.steps.push(reaction.map(|()| None).boxed());
        }
        self
    }

    pub fn state(&self) -> ReadOnlyState<S> {
        self.store.readonly()
    }

    /// Apply every transition that is ready right now.
    ///
    /// Returns the number of states written. Never waits.
    pub fn drain(&mut self) -> usize {
        let mut written = 0;
        while let Some(Some(step)) = self.steps.next().now_or_never() {
            if let Some(next) = step {
                self.store.write(next);
                written += 1;
            }
        }
        written
    }

    /// Run until the session lifetime ends or every event source closes.
    pub async fn run(mut self, lifetime: LifetimeHandle) {
        tracing::debug!("transition engine started");
        loop {
            tokio::select! {
                biased;
                _ = lifetime.wait() => break,
                step = self.steps.next() => match step {
                    Some(Some(next)) => self.store.write(next),
                    Some(None) => {}
                    None => break,
                },
            }
        }
        tracing::debug!(revision = self.store.revision(), "transition engine stopped");
    }
}

impl<S: fmt::Debug> fmt::Debug for TransitionEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("store", &self.store)
            .field("sources", &self.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::reactive::Signal;
    use crate::session::SessionLifetime;
    use crate::state::LoadingState;
    use crate::transition::{filtered_by_state, Transition};

    type State = LoadingState<u32, String>;

    struct Fixture {
        engine: TransitionEngine<State>,
        refresh: Signal<()>,
        retry: Signal<()>,
        loaded: Signal<u32>,
        failed: Signal<String>,
        reloads: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let store = StateStore::new(State::Loading);
        let refresh = Signal::new();
        let retry = Signal::new();
        let loaded = Signal::new();
        let failed = Signal::new();
        let reloads = Arc::new(AtomicUsize::new(0));

        let reload = |count: &Arc<AtomicUsize>| {
            let count = Arc::clone(count);
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };

        let rules = vec![
            Transition::when("refresh", refresh.subscribe(), State::is_loaded, |()| {
                State::Loading
            })
            .with_effect(reload(&reloads))
            .boxed(),
            Transition::when("retry", retry.subscribe(), State::is_failed, |()| {
                State::Loading
            })
            .with_effect(reload(&reloads))
            .boxed(),
            Transition::when("failed", failed.subscribe(), State::is_loading, State::Failed)
                .boxed(),
            Transition::when("loaded", loaded.subscribe(), State::is_loading, State::Loaded)
                .boxed(),
        ];

        Fixture {
            engine: TransitionEngine::new(store, rules),
            refresh,
            retry,
            loaded,
            failed,
            reloads,
        }
    }

    #[test]
    fn full_cycle_through_every_rule() {
        let mut f = fixture();
        let mut states = f.engine.state().subscribe();

        f.failed.emit("offline".into());
        assert_eq!(f.engine.drain(), 1);
        f.retry.emit(());
        assert_eq!(f.engine.drain(), 1);
        f.loaded.emit(3);
        assert_eq!(f.engine.drain(), 1);
        f.refresh.emit(());
        assert_eq!(f.engine.drain(), 1);

        assert_eq!(
            states.drain(),
            vec![
                State::Loading,
                State::Failed("offline".into()),
                State::Loading,
                State::Loaded(3),
                State::Loading,
            ]
        );
        assert_eq!(f.reloads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn illegal_events_write_nothing() {
        let mut f = fixture();
        let state = f.engine.state();

        // Loading: neither tap applies.
        f.refresh.emit(());
        f.retry.emit(());
        assert_eq!(f.engine.drain(), 0);

        f.failed.emit("offline".into());
        f.engine.drain();
        let before = state.revision();

        // Failed: refresh, a second failure and a late success are all dropped.
        f.refresh.emit(());
        f.failed.emit("again".into());
        f.loaded.emit(1);
        assert_eq!(f.engine.drain(), 0);
        assert_eq!(state.revision(), before);
        assert_eq!(state.read(), State::Failed("offline".into()));
        assert_eq!(f.reloads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn overlapping_sources_admit_one_transition() {
        let mut f = fixture();
        f.failed.emit("offline".into());
        f.engine.drain();

        // Two retry taps before the engine runs: only the first finds `Failed`.
        f.retry.emit(());
        f.retry.emit(());
        assert_eq!(f.engine.drain(), 1);
        assert_eq!(f.reloads.load(Ordering::SeqCst), 1);
        assert_eq!(f.engine.state().read(), State::Loading);
    }

    #[test]
    fn reactions_see_state_at_their_arrival() {
        let mut f = fixture();
        let taps = Signal::new();
        let routed = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&routed);
        let reaction = filtered_by_state(taps.subscribe(), f.engine.state(), State::is_loaded)
            .map(move |()| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .boxed();
        let mut engine = f.engine.with_reactions(vec![reaction]);

        taps.emit(());
        engine.drain();
        assert_eq!(routed.load(Ordering::SeqCst), 0);

        f.loaded.emit(9);
        engine.drain();
        taps.emit(());
        assert_eq!(engine.drain(), 0);
        assert_eq!(routed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn run_stops_when_lifetime_ends() {
        let f = fixture();
        let state = f.engine.state();
        let lifetime = SessionLifetime::new();
        let task = tokio::spawn(f.engine.run(lifetime.handle()));

        let mut states = state.subscribe();
        f.loaded.emit(1);
        assert_eq!(states.recv().await, Some(State::Loading));
        assert_eq!(states.recv().await, Some(State::Loaded(1)));

        lifetime.end();
        task.await.expect("engine task panicked");
        assert!(state.is_closed());
    }
}
