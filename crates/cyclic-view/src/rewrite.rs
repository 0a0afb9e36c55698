#![forbid(unsafe_code)]

//! Binds symbolic hook values to a view's event channels.
//!
//! # Invariants
//!
//! 1. After [`rewrite`], every hook in the tree is callable.
//! 2. A hook naming a declared channel forwards each event to that channel
//!    exactly once per invocation.
//! 3. A hook naming an undeclared channel becomes a no-op. This is never an
//!    error: malformed markup must not break rendering.
//! 4. Hooks that are already callable are left untouched, so a second pass
//!    over the same tree changes nothing.

use ahash::RandomState;
use cyclic_runtime::Subject;
use indexmap::IndexMap;

use crate::vtree::{Handler, HookValue, VTree};

/// Event channels of a view, keyed by declared name.
pub type ChannelMap<E> = IndexMap<String, Subject<E>, RandomState>;

/// Counts from one rewrite pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteReport {
    /// Hooks bound to a declared channel.
    pub bound: usize,
    /// Hooks whose channel was not declared and became no-ops.
    pub unresolved: usize,
}

/// Replace every symbolic hook value in `tree` with a callable, in place.
///
/// Traversal is depth-first, pre-order.
pub fn rewrite<E: 'static>(tree: &mut VTree<E>, channels: &ChannelMap<E>) -> RewriteReport {
    let _span = tracing::debug_span!("vtree.rewrite", channels = channels.len()).entered();
    let mut report = RewriteReport::default();
    rewrite_node(tree, channels, &mut report);
    tracing::debug!(
        bound = report.bound,
        unresolved = report.unresolved,
        "vtree.rewrite"
    );
    report
}

fn rewrite_node<E: 'static>(
    tree: &mut VTree<E>,
    channels: &ChannelMap<E>,
    report: &mut RewriteReport,
) {
    let VTree::Element(node) = tree else {
        return;
    };
    for (attribute, hook) in &mut node.hooks {
        let HookValue::Channel(name) = &hook.value else {
            continue;
        };
        let handler = match channels.get(name.as_str()) {
            Some(channel) => {
                report.bound += 1;
                Handler::forward(channel)
            }
            None => {
                report.unresolved += 1;
                tracing::debug!(
                    hook = attribute.as_str(),
                    channel = name.as_str(),
                    "hook names an undeclared channel, binding no-op"
                );
                Handler::noop()
            }
        };
        hook.value = HookValue::Handler(handler);
    }
    for child in &mut node.children {
        rewrite_node(child, channels, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vtree::VNode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn channels(names: &[&str]) -> ChannelMap<u32> {
        names
            .iter()
            .map(|n| (n.to_string(), Subject::new()))
            .collect()
    }

    fn record(channel: &Subject<u32>) -> (Rc<RefCell<Vec<u32>>>, cyclic_runtime::Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let sub = channel.subscribe(move |v| s.borrow_mut().push(*v));
        (seen, sub)
    }

    #[test]
    fn declared_channel_receives_event() {
        let chans = channels(&["submit$"]);
        let (seen, _sub) = record(&chans["submit$"]);
        let mut tree: VTree<u32> = VNode::new("button").hook("ev-click", "submit$").into();

        let report = rewrite(&mut tree, &chans);
        assert_eq!(report, RewriteReport { bound: 1, unresolved: 0 });

        assert!(tree.find_hook("ev-click").unwrap().invoke(7));
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn undeclared_channel_is_noop() {
        let chans = channels(&["submit$"]);
        let (seen, _sub) = record(&chans["submit$"]);
        let mut tree: VTree<u32> = VNode::new("button").hook("ev-click", "typo$").into();

        let report = rewrite(&mut tree, &chans);
        assert_eq!(report.unresolved, 1);

        let hook = tree.find_hook("ev-click").unwrap();
        assert!(hook.value.is_callable());
        assert!(hook.invoke(1));
        assert!(seen.borrow().is_empty());
        assert_eq!(chans["submit$"].publish_count(), 0);
    }

    #[test]
    fn nested_children_are_rewritten() {
        let chans = channels(&["a$", "b$"]);
        let (seen_a, _sa) = record(&chans["a$"]);
        let (seen_b, _sb) = record(&chans["b$"]);
        let mut tree: VTree<u32> = VNode::new("ul")
            .child(VNode::new("li").child(VNode::new("button").hook("ev-click", "a$")))
            .child("between")
            .child(VNode::new("li").hook("ev-dblclick", "b$"))
            .into();

        rewrite(&mut tree, &chans);
        assert!(tree.hooks().iter().all(|(_, h)| h.value.is_callable()));

        tree.find_hook("ev-click").unwrap().invoke(1);
        tree.find_hook("ev-dblclick").unwrap().invoke(2);
        assert_eq!(*seen_a.borrow(), vec![1]);
        assert_eq!(*seen_b.borrow(), vec![2]);
    }

    #[test]
    fn second_pass_changes_nothing() {
        let chans = channels(&["a$"]);
        let (seen, _sub) = record(&chans["a$"]);
        let mut tree: VTree<u32> = VNode::new("div").hook("ev-click", "a$").into();

        rewrite(&mut tree, &chans);
        let again = rewrite(&mut tree, &chans);
        assert_eq!(again, RewriteReport::default());

        tree.find_hook("ev-click").unwrap().invoke(5);
        assert_eq!(*seen.borrow(), vec![5], "still forwards after a second pass");
    }

    #[test]
    fn text_root_untouched() {
        let mut tree: VTree<u32> = VTree::text("plain");
        assert_eq!(rewrite(&mut tree, &channels(&[])), RewriteReport::default());
        assert!(matches!(tree, VTree::Text(ref t) if t == "plain"));
    }

    #[test]
    fn each_hook_bound_independently() {
        let chans = channels(&["x$"]);
        let (seen, _sub) = record(&chans["x$"]);
        let mut tree: VTree<u32> = VNode::new("div")
            .hook("ev-click", "x$")
            .hook("ev-keyup", "x$")
            .into();

        rewrite(&mut tree, &chans);
        tree.find_hook("ev-click").unwrap().invoke(1);
        tree.find_hook("ev-keyup").unwrap().invoke(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
