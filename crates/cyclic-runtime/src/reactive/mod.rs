#![forbid(unsafe_code)]

//! Reactive primitives for cyclic.
//!
//! This module provides the minimal push-based plumbing the view layer needs:
//!
//! - [`Subject`]: A shared, multicast broadcast channel. Every published value
//!   is delivered synchronously to all live subscribers.
//! - [`Stream`]: A cold, repeatable lazy sequence. Each subscription re-runs
//!   the producer from the start.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`SubscriptionScope`]: Collects subscriptions for a logical owner and
//!   releases them together.
//!
//! # Architecture
//!
//! `Subject<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers; the strong pointer
//! lives inside the returned [`Subscription`]. Dead entries are cleaned up
//! lazily during notification.
//!
//! `Stream<T>` is a shared producer function. It performs no buffering and no
//! replay of its own: repeatability comes from the producer itself.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Publishing to a subject with no subscribers drops the value.
//! 3. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 4. A subscriber added during delivery does not see the value being
//!    delivered.
//! 5. Subscribing to a [`Stream`] twice runs its producer twice.

pub mod scope;
pub mod stream;
pub mod subject;
pub mod subscription;

pub use scope::SubscriptionScope;
pub use stream::{Sink, Stream};
pub use subject::Subject;
pub use subscription::Subscription;
