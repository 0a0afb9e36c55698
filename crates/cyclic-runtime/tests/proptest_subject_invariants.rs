//! Property tests for broadcast delivery.

use std::cell::RefCell;
use std::rc::Rc;

use cyclic_runtime::{Stream, Subject, Subscription};
use proptest::prelude::*;

proptest! {
    /// Every live subscriber sees every value, in registration order.
    #[test]
    fn delivery_order_matches_registration(
        subscribers in 1usize..8,
        values in prop::collection::vec(any::<i16>(), 0..16),
    ) {
        let subject = Subject::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _subs: Vec<Subscription> = (0..subscribers)
            .map(|id| {
                let log = Rc::clone(&log);
                subject.subscribe(move |v: &i16| log.borrow_mut().push((id, *v)))
            })
            .collect();

        for v in &values {
            subject.publish(*v);
        }

        let expected: Vec<(usize, i16)> = values
            .iter()
            .flat_map(|v| (0..subscribers).map(move |id| (id, *v)))
            .collect();
        prop_assert_eq!(&*log.borrow(), &expected);
    }

    /// Dropping an arbitrary subset of subscriptions silences exactly those.
    #[test]
    fn dropped_subscribers_are_silent(keep in prop::collection::vec(any::<bool>(), 1..10)) {
        let subject: Subject<()> = Subject::new();
        let hits = Rc::new(RefCell::new(vec![0u32; keep.len()]));
        let mut subs: Vec<Option<Subscription>> = (0..keep.len())
            .map(|i| {
                let hits = Rc::clone(&hits);
                Some(subject.subscribe(move |_| hits.borrow_mut()[i] += 1))
            })
            .collect();

        for (sub, &kept) in subs.iter_mut().zip(&keep) {
            if !kept {
                sub.take();
            }
        }
        subject.publish(());

        let expected: Vec<u32> = keep.iter().map(|&k| u32::from(k)).collect();
        prop_assert_eq!(&*hits.borrow(), &expected);
        prop_assert_eq!(subject.subscriber_count(), keep.iter().filter(|&&k| k).count());
    }

    /// `Stream::of` replays the full sequence to each subscription.
    #[test]
    fn of_replays_per_subscription(values in prop::collection::vec(any::<u8>(), 0..12), runs in 1usize..4) {
        let stream = Stream::of(values.clone());
        for _ in 0..runs {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let s = Rc::clone(&seen);
            let _sub = stream.subscribe(move |v| s.borrow_mut().push(v));
            prop_assert_eq!(&*seen.borrow(), &values);
        }
    }
}
