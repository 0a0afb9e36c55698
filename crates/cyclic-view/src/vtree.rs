#![forbid(unsafe_code)]

//! Tree snapshots emitted by a View.
//!
//! A [`VTree`] is either an element ([`VNode`]) or a text leaf. Elements carry
//! ordered [`Hooks`]: interaction points such as `ev-click` whose value starts
//! out as a symbolic channel name ([`HookValue::Channel`]) and ends up as a
//! callable [`Handler`] once the view has rewritten the snapshot.
//!
//! ```ignore
//! let tree: VTree<Click> = VNode::new("form")
//!     .child(VNode::new("input").property("type", "text"))
//!     .child(VNode::new("button").hook("ev-click", "submit$").child("Go"))
//!     .into();
//! ```

use std::rc::Rc;

use ahash::RandomState;
use cyclic_runtime::Subject;
use indexmap::IndexMap;

use crate::error::{Result, ViewError};

pub type Hooks<E> = IndexMap<String, Hook<E>, RandomState>;
pub type Properties = IndexMap<String, String, RandomState>;

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Callable bound into a hook. The renderer invokes it with the native
/// interaction event.
pub struct Handler<E> {
    f: Rc<dyn Fn(E)>,
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<E> std::fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Handler(..)")
    }
}

impl<E: 'static> Handler<E> {
    pub fn new(f: impl Fn(E) + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// A handler that discards its argument.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// A handler that publishes every event on `channel`.
    #[must_use]
    pub fn forward(channel: &Subject<E>) -> Self {
        let channel = channel.clone();
        Self::new(move |event| channel.publish(event))
    }

    pub fn call(&self, event: E) {
        (self.f)(event);
    }
}

// ---------------------------------------------------------------------------
// Hook
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub enum HookValue<E> {
    /// Name of a view event channel, not yet resolved.
    Channel(String),
    /// Resolved callable.
    Handler(Handler<E>),
}

impl<E> HookValue<E> {
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Handler(_))
    }

    #[must_use]
    pub fn channel_name(&self) -> Option<&str> {
        match self {
            Self::Channel(name) => Some(name),
            Self::Handler(_) => None,
        }
    }
}

/// Per-node descriptor binding an interaction point to a value.
#[derive(Clone, Debug)]
pub struct Hook<E> {
    pub value: HookValue<E>,
}

impl<E: 'static> Hook<E> {
    /// A hook naming the event channel it should feed.
    pub fn channel(name: impl Into<String>) -> Self {
        Self {
            value: HookValue::Channel(name.into()),
        }
    }

    #[must_use]
    pub fn handler(handler: Handler<E>) -> Self {
        Self {
            value: HookValue::Handler(handler),
        }
    }

    /// Call the bound handler with `event`. Returns `false` when the hook
    /// still holds a symbolic name, in which case the event is dropped.
    pub fn invoke(&self, event: E) -> bool {
        match &self.value {
            HookValue::Handler(handler) => {
                handler.call(event);
                true
            }
            HookValue::Channel(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// VNode / VTree
// ---------------------------------------------------------------------------

/// An element node.
#[derive(Clone, Debug)]
pub struct VNode<E> {
    pub tag: String,
    pub key: Option<String>,
    pub properties: Properties,
    pub hooks: Hooks<E>,
    pub children: Vec<VTree<E>>,
}

impl<E: 'static> VNode<E> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            properties: Properties::default(),
            hooks: Hooks::default(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Attach a hook whose events go to the view channel `channel`.
    #[must_use]
    pub fn hook(mut self, attribute: impl Into<String>, channel: impl Into<String>) -> Self {
        self.hooks.insert(attribute.into(), Hook::channel(channel));
        self
    }

    /// Attach an already-callable hook.
    #[must_use]
    pub fn handler(mut self, attribute: impl Into<String>, handler: Handler<E>) -> Self {
        self.hooks.insert(attribute.into(), Hook::handler(handler));
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<VTree<E>>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<VTree<E>>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

/// One rendering of a UI tree.
#[derive(Clone, Debug)]
pub enum VTree<E> {
    Element(VNode<E>),
    Text(String),
}

impl<E: 'static> VTree<E> {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&VNode<E>> {
        match self {
            Self::Element(node) => Some(node),
            Self::Text(_) => None,
        }
    }

    /// Visit every element in document order (depth-first, pre-order).
    pub fn walk(&self, visit: &mut impl FnMut(&VNode<E>)) {
        if let Self::Element(node) = self {
            visit(node);
            for child in &node.children {
                child.walk(visit);
            }
        }
    }

    /// The first hook registered under `attribute`, in document order.
    #[must_use]
    pub fn find_hook(&self, attribute: &str) -> Option<&Hook<E>> {
        let Self::Element(node) = self else {
            return None;
        };
        node.hooks
            .get(attribute)
            .or_else(|| node.children.iter().find_map(|c| c.find_hook(attribute)))
    }

    /// Every hook in the tree, in document order.
    #[must_use]
    pub fn hooks(&self) -> Vec<(&str, &Hook<E>)> {
        let mut out = Vec::new();
        collect_hooks(self, &mut out);
        out
    }

    /// Check the snapshot is well formed: non-empty element tags and
    /// non-empty hook attributes. Channel names are not checked here; one
    /// that matches nothing is bound to a no-op by the rewriter.
    pub fn validate(&self) -> Result<()> {
        validate_at(self, &mut String::from("root"))
    }
}

impl<E: 'static> From<VNode<E>> for VTree<E> {
    fn from(node: VNode<E>) -> Self {
        Self::Element(node)
    }
}

impl<E: 'static> From<&str> for VTree<E> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<E: 'static> From<String> for VTree<E> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

fn collect_hooks<'a, E>(tree: &'a VTree<E>, out: &mut Vec<(&'a str, &'a Hook<E>)>) {
    if let VTree::Element(node) = tree {
        out.extend(node.hooks.iter().map(|(attr, hook)| (attr.as_str(), hook)));
        for child in &node.children {
            collect_hooks(child, out);
        }
    }
}

fn validate_at<E>(tree: &VTree<E>, path: &mut String) -> Result<()> {
    let VTree::Element(node) = tree else {
        return Ok(());
    };
    if node.tag.trim().is_empty() {
        return Err(ViewError::malformed(path.as_str(), "element has an empty tag"));
    }
    for attribute in node.hooks.keys() {
        if attribute.is_empty() {
            return Err(ViewError::malformed(path.as_str(), "hook has an empty attribute name"));
        }
    }
    for (index, child) in node.children.iter().enumerate() {
        let len = path.len();
        path.push('.');
        path.push_str(&index.to_string());
        validate_at(child, path)?;
        path.truncate(len);
    }
    Ok(())
}
