// #![include_doc("../README.md", start)]
//! # sigtrack
//!
//! `sigtrack` is a small, synchronous signal/effect graph with automatic dependency tracking.
//!
//! ## Features
//!
//! - Effects discover their dependencies by reading state; nothing is declared up front.
//! - Dependencies are rebuilt on every run, so conditional reads never leave stale subscriptions behind.
//! - Writes propagate synchronously and depth-first.
//! - Writes of the same value (`Object.is` semantics, see `SameValue`) are ignored.
//! - Each `Runtime` is an independent graph.
//!
//! ```rust
//! use sigtrack::Runtime;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let rt = Runtime::new();
//! let (count, set_count) = rt.signal(0);
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let _e = rt.effect({
//!     let log = log.clone();
//!     move || log.borrow_mut().push(count.get())
//! });
//! assert_eq!(*log.borrow(), [0]);
//!
//! set_count.set(2);
//! assert_eq!(*log.borrow(), [0, 2]);
//!
//! set_count.set(2); // same value, nothing happens
//! assert_eq!(*log.borrow(), [0, 2]);
//! ```
//!
//! Effects stay alive as long as a state they depend on is alive. Call `Effect::dispose` to stop one.
//!
//! An effect that writes a state it also reads is not guarded against.
//! If the write always changes the value, the effect recurses until the stack overflows.
//!
//! ## License
//!
//! This project is dual licensed under Apache-2.0/MIT. See the two LICENSE-\* files for details.
//!
//! ## Contribution
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.
// #![include_doc("../README.md", end)]
