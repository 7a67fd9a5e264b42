//! Guarded state transitions.
//!
//! # Architecture
//!
//! ```text
//! events ──→ Transition (guard · effect · map) ──┐
//! events ──→ Transition ─────────────────────────┼──→ merge_all ──→ StateStore
//! events ──→ Transition ─────────────────────────┘                    │
//!    ↑                                                                │
//!    └──────────── guards read the current state ─────────────────────┘
//! ```
//!
//! - `filter`: gating operators that read the state at event arrival
//! - `rule`: the `Transition` edge type and the object-safe `TransitionRule`
//! - `engine`: merging rules and writing their output into the store

mod engine;
mod filter;
mod rule;

pub use engine::{merge_all, Reaction, TransitionEngine};
pub use filter::{filter_map_by_state, filtered_by_state};
pub use rule::{Transition, TransitionRule};
