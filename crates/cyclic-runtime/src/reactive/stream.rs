#![forbid(unsafe_code)]

//! Cold, repeatable lazy sequences.
//!
//! A [`Stream<T>`] is a shared producer: subscribing hands the producer a
//! [`Sink`] and the producer pushes values into it, either synchronously
//! (e.g. [`Stream::of`]) or later (e.g. [`Stream::from_subject`]). Values are
//! passed **by value**, so every emission has a single owner downstream.
//!
//! Operators ([`Stream::map`], [`Stream::filter_map`]) are lazy: nothing runs
//! until `subscribe`, and each subscription runs the whole chain again.

use std::rc::Rc;

use super::subject::Subject;
use super::subscription::Subscription;

/// Receiving end handed to a stream producer.
pub type Sink<T> = Rc<dyn Fn(T)>;

type Producer<T> = dyn Fn(Sink<T>) -> Subscription;

/// A lazy, repeatable sequence of values.
pub struct Stream<T> {
    producer: Rc<Producer<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T> std::fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream").finish_non_exhaustive()
    }
}

impl<T: 'static> Stream<T> {
    /// Create a stream from a producer function. The producer runs once per
    /// subscription and returns whatever keeps its source alive.
    pub fn new(producer: impl Fn(Sink<T>) -> Subscription + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// A stream that completes immediately without emitting.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(|_| Subscription::empty())
    }

    /// Emit a clone of every value, in order, synchronously on subscribe.
    pub fn of(values: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone,
    {
        let values: Rc<[T]> = values.into_iter().collect();
        Self::new(move |sink| {
            for value in values.iter() {
                sink(value.clone());
            }
            Subscription::empty()
        })
    }

    /// Emit a single value synchronously on subscribe.
    pub fn just(value: T) -> Self
    where
        T: Clone,
    {
        Self::of([value])
    }

    /// Bridge a hot [`Subject`] into a stream. Each subscriber sees values
    /// published after it subscribed.
    pub fn from_subject(subject: &Subject<T>) -> Self
    where
        T: Clone,
    {
        let subject = subject.clone();
        Self::new(move |sink| subject.subscribe(move |value: &T| sink(value.clone())))
    }

    /// Transform every value.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Stream<U> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            upstream.subscribe(move |value| sink(f(value)))
        })
    }

    /// Transform every value, dropping those mapped to `None`.
    pub fn filter_map<U: 'static>(&self, f: impl Fn(T) -> Option<U> + 'static) -> Stream<U> {
        let upstream = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            upstream.subscribe(move |value| {
                if let Some(mapped) = f(value) {
                    sink(mapped);
                }
            })
        })
    }

    /// Push every emitted value into `target`.
    pub fn forward_to(&self, target: &Subject<T>) -> Subscription {
        let target = target.clone();
        self.subscribe(move |value| target.publish(value))
    }

    /// Run the producer, delivering values to `sink`.
    pub fn subscribe(&self, sink: impl Fn(T) + 'static) -> Subscription {
        (self.producer)(Rc::new(sink))
    }
}
