#![forbid(unsafe_code)]

//! Deferred interface proxies for circular construction.
//!
//! Two components that each consume the other's outputs cannot both be built
//! first. [`Backward`] breaks the cycle with a two-phase protocol:
//!
//! 1. **Construct.** Each side is built against a [`Placeholder`]: one proxy
//!    [`Subject`] per name in its required [`Interface`]. The definition
//!    function runs once, immediately, and may subscribe to (or derive
//!    streams from) the proxies even though nothing feeds them yet.
//! 2. **Wire.** Once both sides exist, a coordinator calls
//!    [`Placeholder::inject`] on each, handing it the other side. Every real
//!    channel is forwarded into the matching proxy, so subscriptions made in
//!    phase 1 start receiving values.
//!
//! ```ignore
//! let view = define_view(Interface::new(["count$"]), render)?;
//! let model = Backward::new(&Interface::new(["submit$"]), count_submits)?;
//! view.inject(&model)?;
//! model.inject(&view)?;
//! ```
//!
//! # Invariants
//!
//! 1. The definition function is invoked exactly once per [`Backward::new`].
//! 2. The placeholder handle is shared: every clone observes the same proxies
//!    and the same injected links for the lifetime of the result.
//! 3. `inject` is all-or-nothing. A counterpart missing any required name
//!    fails with [`ViewError::MissingRequiredCapability`] and links nothing.
//! 4. Re-injecting replaces the previous links.
//!
//! # Value types
//!
//! A [`Placeholder<T>`] carries one value type for every name in its
//! interface. A counterpart exposing channels of different types (a list of
//! items next to a filter string) is modeled with an enum covering them, and
//! the definition function narrows each stream with [`Stream::filter_map`]:
//!
//! ```ignore
//! #[derive(Clone)]
//! enum ModelValue {
//!     Todos(Vec<Todo>),
//!     Filter(String),
//! }
//!
//! let filter = model.stream("filter$")?.filter_map(|value| match value {
//!     ModelValue::Filter(filter) => Some(filter),
//!     _ => None,
//! });
//! ```

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::hash::BuildHasher;
use std::rc::Rc;

use ahash::RandomState;
use cyclic_runtime::{Stream, Subject, Subscription, SubscriptionScope};
use indexmap::IndexMap;

use crate::error::{DEFAULT_MISSING_PREFIX, Result, ViewError};

// ---------------------------------------------------------------------------
// Interface
// ---------------------------------------------------------------------------

/// Ordered, de-duplicated set of capability names one component requires
/// from its counterpart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interface {
    names: Rc<[String]>,
}

impl Interface {
    /// Build an interface from capability names. Later duplicates are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().collect()
    }

    /// An interface requiring nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Interface {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in iter {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            names: names.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Something that can supply named channels to a counterpart's placeholder.
pub trait Capabilities<T> {
    /// The channel published under `name`, if any.
    fn capability(&self, name: &str) -> Option<Subject<T>>;
}

impl<T: 'static, S: BuildHasher> Capabilities<T> for IndexMap<String, Subject<T>, S> {
    fn capability(&self, name: &str) -> Option<Subject<T>> {
        self.get(name).cloned()
    }
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

struct PlaceholderInner<T> {
    proxies: IndexMap<String, Subject<T>, RandomState>,
    prefix: RefCell<Cow<'static, str>>,
    links: RefCell<SubscriptionScope>,
    injected: Cell<bool>,
}

/// Interface-shaped stand-in for a counterpart that does not exist yet.
///
/// Cloning a `Placeholder` creates a new handle to the **same** proxies.
pub struct Placeholder<T> {
    inner: Rc<PlaceholderInner<T>>,
}

impl<T> Clone for Placeholder<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Placeholder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placeholder")
            .field("names", &self.inner.proxies.keys().collect::<Vec<_>>())
            .field("injected", &self.inner.injected.get())
            .finish()
    }
}

impl<T: 'static> Placeholder<T> {
    /// Create one proxy channel per name in `interface`.
    #[must_use]
    pub fn new(interface: &Interface) -> Self {
        let proxies = interface
            .names()
            .map(|name| (name.to_string(), Subject::new()))
            .collect();
        Self {
            inner: Rc::new(PlaceholderInner {
                proxies,
                prefix: RefCell::new(Cow::Borrowed(DEFAULT_MISSING_PREFIX)),
                links: RefCell::new(SubscriptionScope::new()),
                injected: Cell::new(false),
            }),
        }
    }

    /// The proxy channel for `name`.
    ///
    /// Reading a name outside the interface fails with
    /// [`ViewError::MissingRequiredCapability`].
    pub fn get(&self, name: &str) -> Result<Subject<T>> {
        self.inner
            .proxies
            .get(name)
            .cloned()
            .ok_or_else(|| ViewError::missing(&self.inner.prefix.borrow(), name))
    }

    /// The proxy channel for `name`, as a stream.
    pub fn stream(&self, name: &str) -> Result<Stream<T>>
    where
        T: Clone,
    {
        self.get(name).map(|subject| Stream::from_subject(&subject))
    }

    /// Subscribe to the proxy channel for `name`.
    pub fn subscribe(&self, name: &str, callback: impl Fn(&T) + 'static) -> Result<Subscription> {
        Ok(self.get(name)?.subscribe(callback))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.proxies.keys().map(String::as_str)
    }

    /// Install the message prefix used for missing-capability errors.
    pub fn set_error_prefix(&self, prefix: impl Into<Cow<'static, str>>) {
        *self.inner.prefix.borrow_mut() = prefix.into();
    }

    #[must_use]
    pub fn error_prefix(&self) -> String {
        self.inner.prefix.borrow().to_string()
    }

    /// Whether a counterpart has been wired in.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.inner.injected.get()
    }

    /// Forward every required channel of `counterpart` into this placeholder.
    pub fn inject<C>(&self, counterpart: &C) -> Result<()>
    where
        C: Capabilities<T> + ?Sized,
        T: Clone,
    {
        let mut resolved = Vec::with_capacity(self.inner.proxies.len());
        for (name, proxy) in &self.inner.proxies {
            let real = counterpart
                .capability(name)
                .ok_or_else(|| ViewError::missing(&self.inner.prefix.borrow(), name.as_str()))?;
            resolved.push((real, proxy));
        }

        let mut links = self.inner.links.borrow_mut();
        links.clear();
        for (real, proxy) in resolved {
            links.hold(real.forward_to(proxy));
        }
        self.inner.injected.set(true);
        tracing::debug!(capabilities = links.len(), "placeholder.inject");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Backward
// ---------------------------------------------------------------------------

/// A result object built against a placeholder of its counterpart.
pub struct Backward<T, R> {
    placeholder: Placeholder<T>,
    output: R,
}

impl<T: 'static, R> Backward<T, R> {
    /// Build the placeholder for `interface` and run `definition` with it.
    pub fn new(
        interface: &Interface,
        definition: impl FnOnce(&Placeholder<T>) -> Result<R>,
    ) -> Result<Self> {
        let placeholder = Placeholder::new(interface);
        let output = definition(&placeholder)?;
        Ok(Self {
            placeholder,
            output,
        })
    }

    #[must_use]
    pub fn placeholder(&self) -> &Placeholder<T> {
        &self.placeholder
    }

    #[must_use]
    pub fn output(&self) -> &R {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut R {
        &mut self.output
    }

    pub fn into_parts(self) -> (Placeholder<T>, R) {
        (self.placeholder, self.output)
    }

    /// Wire the real counterpart into the placeholder.
    pub fn inject<C>(&self, counterpart: &C) -> Result<()>
    where
        C: Capabilities<T> + ?Sized,
        T: Clone,
    {
        self.placeholder.inject(counterpart)
    }
}

impl<T, U, R: Capabilities<U>> Capabilities<U> for Backward<T, R> {
    fn capability(&self, name: &str) -> Option<Subject<U>> {
        self.output.capability(name)
    }
}

impl<T, R: std::fmt::Debug> std::fmt::Debug for Backward<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backward")
            .field("placeholder", &self.placeholder)
            .field("output", &self.output)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Named output channels plus the subscriptions that feed them.
///
/// This is the usual result object for the Model side of a cycle: the
/// definition function declares its outputs here and keeps its internal
/// wiring alive in the attached scope.
pub struct Outputs<T> {
    channels: IndexMap<String, Subject<T>, RandomState>,
    scope: SubscriptionScope,
}

impl<T: 'static> Outputs<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: IndexMap::default(),
            scope: SubscriptionScope::new(),
        }
    }

    /// The output channel named `name`, created on first use.
    pub fn channel(&mut self, name: impl Into<String>) -> Subject<T> {
        self.channels.entry(name.into()).or_default().clone()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Subject<T>> {
        self.channels.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Keep `sub` alive as long as these outputs.
    pub fn hold(&mut self, sub: Subscription) {
        self.scope.hold(sub);
    }

    pub fn scope_mut(&mut self) -> &mut SubscriptionScope {
        &mut self.scope
    }
}

impl<T: 'static> Default for Outputs<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Capabilities<T> for Outputs<T> {
    fn capability(&self, name: &str) -> Option<Subject<T>> {
        self.channels.get(name).cloned()
    }
}

impl<T> std::fmt::Debug for Outputs<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outputs")
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .field("scope", &self.scope)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
