#![forbid(unsafe_code)]

//! Reactive runtime for cyclic: broadcast channels, lazy streams, and
//! subscription lifetimes.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and synchronous. See
//! [`reactive`] for the delivery invariants.

pub mod reactive;

pub use reactive::{Sink, Stream, Subject, Subscription, SubscriptionScope};
