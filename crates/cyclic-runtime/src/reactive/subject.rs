#![forbid(unsafe_code)]

//! Multicast broadcast channel.
//!
//! A [`Subject<T>`] has two roles: a publish side ([`Subject::publish`]) and a
//! subscribe side ([`Subject::subscribe`]). Cloning a subject creates a new
//! handle to the **same** channel; use [`Subject::new`] for an independent
//! one.
//!
//! # Invariants
//!
//! 1. Delivery is synchronous, on the publishing call, in registration order.
//! 2. No buffering and no replay: a value published with no live subscribers
//!    is dropped.
//! 3. A subscriber added while a value is being delivered does not receive
//!    that value.
//! 4. Once its [`Subscription`] is dropped, a callback is never invoked by a
//!    later `publish`.
//! 5. Dead entries are pruned on `publish` and whenever `subscribe` would
//!    grow the list, so the list never holds more than twice the live
//!    subscribers plus a small constant.
//!
//! # Failure Modes
//!
//! - Subscriber panic: propagates to the caller of `publish()`. Subscribers
//!   after the panicking one are not notified for that value.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::subscription::Subscription;

type Callback<T> = dyn Fn(&T);

struct SubjectInner<T> {
    subscribers: Vec<Weak<Callback<T>>>,
    published: u64,
}

/// A shared, multicast, push-based channel.
pub struct Subject<T> {
    inner: Rc<RefCell<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Subject")
            .field(
                "subscribers",
                &inner
                    .subscribers
                    .iter()
                    .filter(|w| w.strong_count() > 0)
                    .count(),
            )
            .field("published", &inner.published)
            .finish()
    }
}

impl<T: 'static> Subject<T> {
    /// Create a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SubjectInner {
                subscribers: Vec::new(),
                published: 0,
            })),
        }
    }

    /// Register `callback` for every value published from now on.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        // Prune dead entries before the list would grow, so subscribe/drop
        // churn without a publish stays bounded by twice the live count.
        if inner.subscribers.len() == inner.subscribers.capacity() {
            inner.subscribers.retain(|w| w.strong_count() > 0);
        }
        inner.subscribers.push(Rc::downgrade(&strong));
        Subscription::new(strong)
    }

    /// Deliver `value` to all live subscribers.
    pub fn publish(&self, value: T) {
        // Snapshot under the borrow, deliver outside it, so callbacks may
        // publish or subscribe re-entrantly.
        let live: Vec<Rc<Callback<T>>> = {
            let mut inner = self.inner.borrow_mut();
            inner.published += 1;
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(subscribers = live.len(), "subject.publish");
        for callback in &live {
            callback(&value);
        }
    }

    /// Forward every value published here into `target`.
    pub fn forward_to(&self, target: &Subject<T>) -> Subscription
    where
        T: Clone,
    {
        let target = target.clone();
        self.subscribe(move |value| target.publish(value.clone()))
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Total number of `publish` calls, including those nobody observed.
    #[must_use]
    pub fn publish_count(&self) -> u64 {
        self.inner.borrow().published
    }

    /// Whether two handles refer to the same channel.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}
