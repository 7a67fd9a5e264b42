//! Receiving end shared by behaviors and signals.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc;

/// Ordered stream of values delivered to a single subscriber.
///
/// Values arrive in publish order, each exactly once. The stream ends when
/// its source is closed (the behavior writer is dropped, or the last signal
/// emitter goes away).
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Wait for the next value. Returns `None` once the source is closed
    /// and every buffered value has been consumed.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take the next buffered value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Take every value buffered right now.
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = self.try_recv() {
            values.push(value);
        }
        values
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Fan-out list of live subscriber channels.
///
/// Senders whose subscription has been dropped are pruned on the next
/// publish. Once closed, new subscribers are handed an already-ended stream.
#[derive(Debug)]
pub(crate) struct Subscribers<T> {
    senders: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

impl<T> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            senders: Vec::new(),
            closed: false,
        }
    }

    /// Register a new subscriber, optionally seeding it with a first value.
    pub(crate) fn attach(&mut self, seed: Option<T>) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(value) = seed {
            let _ = tx.send(value);
        }
        if !self.closed {
            self.senders.push(tx);
        }
        Subscription { rx }
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.senders.clear();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of subscribers still attached.
    pub(crate) fn len(&self) -> usize {
        self.senders.iter().filter(|tx| !tx.is_closed()).count()
    }
}

impl<T: Clone> Subscribers<T> {
    pub(crate) fn publish(&mut self, value: &T) {
        self.senders.retain(|tx| tx.send(value.clone()).is_ok());
    }
}
