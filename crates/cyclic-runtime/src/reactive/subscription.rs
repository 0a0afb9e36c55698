#![forbid(unsafe_code)]

//! RAII subscription guard shared by [`Subject`](super::Subject) and
//! [`Stream`](super::Stream).

use std::any::Any;

/// Keeps a subscriber callback alive. Dropping it unsubscribes.
///
/// The guard is type-erased so subscriptions to channels of different value
/// types can be held in one collection (see
/// [`SubscriptionScope`](super::SubscriptionScope)).
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// Wrap whatever value keeps the subscriber alive.
    pub fn new(guard: impl Any) -> Self {
        Self {
            guard: Some(Box::new(guard)),
        }
    }

    /// A subscription with nothing to release, e.g. for a source that
    /// completed synchronously.
    pub fn empty() -> Self {
        Self { guard: None }
    }

    /// Whether this guard still holds a live subscriber.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Release the subscriber now. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        self.guard.take();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
