//! Framework-agnostic reactive primitives.
//!
//! Two source kinds with different replay semantics, kept as separate types
//! so the difference is visible in signatures:
//!
//! ```text
//! Behavior<T>  ── has a current value, replays it to new subscribers
//! Signal<T>    ── fire-once events, no replay
//!        │
//!        └──→ Subscription<T>  (ordered, each value exactly once)
//! ```

mod behavior;
mod signal;
mod subscription;

pub use behavior::{Behavior, BehaviorReader};
pub use signal::{Signal, SignalReader};
pub use subscription::Subscription;
