#![forbid(unsafe_code)]

//! Ownership of wiring: a scope is where a component parks the
//! [`Subscription`]s it creates, so tearing the component down is one drop.

use super::stream::Stream;
use super::subject::Subject;
use super::subscription::Subscription;

/// An owned stack of subscriptions.
///
/// Teardown runs newest-first: on `clear()` and on drop, the last
/// subscription pushed is the first one released. A cleared scope is empty and
/// accepts new subscriptions; a dropped scope leaves no callback registered
/// anywhere.
///
/// ```ignore
/// let mut links = SubscriptionScope::new();
/// links
///     .subscribe(&clicks, move |_| count.set(count.get() + 1))
///     .subscribe_stream(view.vtree(), render);
/// ```
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to a channel within this scope.
    pub fn subscribe<T: 'static>(
        &mut self,
        source: &Subject<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(callback));
        self
    }

    /// Subscribe to a stream within this scope.
    pub fn subscribe_stream<T: 'static>(
        &mut self,
        source: &Stream<T>,
        sink: impl Fn(T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(sink));
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions now.
    pub fn clear(&mut self) {
        while let Some(sub) = self.subscriptions.pop() {
            drop(sub);
        }
    }
}

impl Default for SubscriptionScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SubscriptionScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for SubscriptionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SubscriptionScope({} held)", self.subscriptions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn scope_holds_subscriptions() {
        let subject = Subject::new();
        let seen = Rc::new(Cell::new(0));

        let mut scope = SubscriptionScope::new();
        let s = Rc::clone(&seen);
        scope.subscribe(&subject, move |v: &i32| s.set(*v));
        assert_eq!(scope.len(), 1);

        subject.publish(42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn scope_drop_releases_subscriptions() {
        let subject = Subject::new();
        let seen = Rc::new(Cell::new(0));

        {
            let mut scope = SubscriptionScope::new();
            let s = Rc::clone(&seen);
            scope.subscribe(&subject, move |v: &i32| s.set(*v));
            subject.publish(1);
            assert_eq!(seen.get(), 1);
        }

        subject.publish(99);
        assert_eq!(seen.get(), 1, "callback should not fire after scope dropped");
    }

    #[test]
    fn scope_clear_is_reusable() {
        let subject: Subject<()> = Subject::new();
        let mut scope = SubscriptionScope::new();

        let first = Rc::new(Cell::new(false));
        let f = Rc::clone(&first);
        scope.subscribe(&subject, move |_| f.set(true));
        scope.clear();
        assert!(scope.is_empty());

        let second = Rc::new(Cell::new(false));
        let s = Rc::clone(&second);
        scope.subscribe(&subject, move |_| s.set(true));

        subject.publish(());
        assert!(!first.get(), "first subscription should be gone");
        assert!(second.get(), "second subscription should be active");
    }

    #[test]
    fn scope_releases_in_reverse_order() {
        struct Marker(u8, Rc<RefCell<Vec<u8>>>);
        impl Drop for Marker {
            fn drop(&mut self) {
                self.1.borrow_mut().push(self.0);
            }
        }

        let released = Rc::new(RefCell::new(Vec::new()));
        let mut scope = SubscriptionScope::new();
        for i in 0..3 {
            scope.hold(Subscription::new(Marker(i, Rc::clone(&released))));
        }
        drop(scope);
        assert_eq!(*released.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn scope_subscribe_stream() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut scope = SubscriptionScope::new();
        let s = Rc::clone(&seen);
        scope.subscribe_stream(&Stream::of([1, 2]), move |v| s.borrow_mut().push(v));
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn scope_debug_format() {
        let subject: Subject<u8> = Subject::new();
        let mut scope = SubscriptionScope::new();
        scope.subscribe(&subject, |_| {});
        scope.subscribe(&subject, |_| {});
        assert!(format!("{scope:?}").contains("2 held"));
    }
}
