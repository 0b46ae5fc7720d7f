//! A single-threaded signal/effect graph with automatic dependency tracking.
//!
//! - [`State<T>`] (or the [`ReadSignal<T>`] / [`WriteSignal<T>`] pair): a value whose readers are tracked.
//! - [`Effect`]: a function that is called again when a state it read changes.
//!
//! Dependencies are recorded while an effect runs and rebuilt from scratch on every run.
//! Writes propagate synchronously: every affected effect has run by the time `set` returns.
//!
//! Effects that write a state they also read are not guarded against;
//! if the write always changes the value, the effect recurses until the stack overflows.
extern crate self as sigtrack;

pub mod core;
mod effect_fn;
mod same_value;
mod state;

#[cfg(doctest)]
mod tests_readme;

pub use crate::core::{EffectId, Runtime};
pub use effect_fn::*;
pub use same_value::*;
pub use state::*;
