#![forbid(unsafe_code)]

//! View assembly.
//!
//! [`define_view`] turns a model interface and a definition function into a
//! [`View`]:
//!
//! 1. The definition function runs once against a model
//!    [`Placeholder`], so it can derive its tree stream from Model channels
//!    that will only be wired in later.
//! 2. Missing Model capabilities are reported as `View expects Model to have
//!    the required property <name>`.
//! 3. One [`Subject`] is created per declared event name.
//! 4. Every snapshot emitted by the definition's tree stream has its hooks
//!    bound to those channels before it reaches the renderer.
//!
//! # Usage
//!
//! ```ignore
//! let view = define_view(Interface::new(["count$"]), |model| {
//!     let vtree = model.stream("count$")?.map(|count: u32| {
//!         VNode::new("button")
//!             .hook("ev-click", "increment$")
//!             .child(format!("clicked {count} times"))
//!             .into()
//!     });
//!     Ok(ViewDefinition::new(vtree).events(["increment$"]))
//! })?;
//!
//! view.inject(&model)?;
//! let _render = view.vtree().subscribe(move |tree| renderer.patch(tree));
//! ```
//!
//! # Invariants
//!
//! 1. A View has exactly one channel per distinct declared event name, and
//!    that channel is never replaced.
//! 2. Every snapshot emitted by [`View::vtree`] has only callable hooks.
//! 3. Each snapshot is rewritten exactly once: the derived stream receives
//!    snapshots by value and performs one pass per emission.
//! 4. [`View::clone_fresh`] shares nothing with the original View.

use std::rc::Rc;

use cyclic_runtime::{Stream, Subject};

use crate::adapter::adapt_errors;
use crate::backward::{Backward, Capabilities, Interface, Placeholder};
use crate::config::ViewConfig;
use crate::error::{Result, ViewError};
use crate::rewrite::{ChannelMap, rewrite};
use crate::vtree::VTree;

/// What a view definition function returns.
pub struct ViewDefinition<E> {
    /// Tree snapshots with symbolic hook values.
    pub vtree: Stream<VTree<E>>,
    /// Names of the event channels the tree's hooks feed.
    pub events: Vec<String>,
}

impl<E: 'static> ViewDefinition<E> {
    pub fn new(vtree: Stream<VTree<E>>) -> Self {
        Self {
            vtree,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.extend(events.into_iter().map(Into::into));
        self
    }
}

impl<E> std::fmt::Debug for ViewDefinition<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewDefinition")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

type DefinitionFn<M, E> = dyn Fn(&Placeholder<M>) -> Result<ViewDefinition<E>>;

/// An assembled View: rewritten tree stream plus its event channels.
pub struct View<M, E> {
    model: Placeholder<M>,
    channels: Rc<ChannelMap<E>>,
    vtree: Stream<VTree<E>>,
    interface: Interface,
    definition: Rc<DefinitionFn<M, E>>,
    config: ViewConfig,
}

/// Assemble a View with [`ViewConfig::from_env`].
pub fn define_view<M, E, F>(model_interface: Interface, definition: F) -> Result<View<M, E>>
where
    M: Clone + 'static,
    E: Clone + 'static,
    F: Fn(&Placeholder<M>) -> Result<ViewDefinition<E>> + 'static,
{
    define_view_with(ViewConfig::from_env(), model_interface, definition)
}

/// Assemble a View with an explicit configuration.
pub fn define_view_with<M, E, F>(
    config: ViewConfig,
    model_interface: Interface,
    definition: F,
) -> Result<View<M, E>>
where
    M: Clone + 'static,
    E: Clone + 'static,
    F: Fn(&Placeholder<M>) -> Result<ViewDefinition<E>> + 'static,
{
    assemble(config, model_interface, Rc::new(definition))
}

fn assemble<M, E>(
    config: ViewConfig,
    interface: Interface,
    definition: Rc<DefinitionFn<M, E>>,
) -> Result<View<M, E>>
where
    M: Clone + 'static,
    E: Clone + 'static,
{
    let backward = adapt_errors(
        Backward::new(&interface, |model| definition(model)),
        config.missing_capability_prefix.clone(),
    )?;
    let (model, ViewDefinition { vtree, events }) = backward.into_parts();

    let channels = Rc::new(declare_channels(&events));
    let vtree = derive_vtree(&vtree, Rc::clone(&channels), config.validate_snapshots);
    tracing::debug!(
        model_capabilities = interface.len(),
        events = channels.len(),
        "view.define"
    );

    Ok(View {
        model,
        channels,
        vtree,
        interface,
        definition,
        config,
    })
}

/// One fresh channel per distinct name, created last-declared first and
/// exposed in declaration order.
fn declare_channels<E: 'static>(events: &[String]) -> ChannelMap<E> {
    let created: Vec<(&String, Subject<E>)> = events
        .iter()
        .rev()
        .map(|name| (name, Subject::new()))
        .collect();
    let mut channels = ChannelMap::default();
    for (name, channel) in created.into_iter().rev() {
        channels.entry(name.clone()).or_insert(channel);
    }
    channels
}

fn derive_vtree<E: 'static>(
    upstream: &Stream<VTree<E>>,
    channels: Rc<ChannelMap<E>>,
    validate: bool,
) -> Stream<VTree<E>> {
    upstream.filter_map(move |mut tree: VTree<E>| {
        let verdict = if validate { tree.validate() } else { Ok(()) };
        if let Err(err) = verdict {
            tracing::error!(error = %err, "vtree.rejected");
            return None;
        }
        rewrite(&mut tree, &channels);
        Some(tree)
    })
}

impl<M, E> View<M, E>
where
    M: Clone + 'static,
    E: Clone + 'static,
{
    /// The rewritten tree stream. Lazy and repeatable exactly as the
    /// definition's stream.
    #[must_use]
    pub fn vtree(&self) -> &Stream<VTree<E>> {
        &self.vtree
    }

    /// The event channel declared as `name`.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&Subject<E>> {
        self.channels.get(name)
    }

    /// Like [`View::channel`], failing for undeclared names.
    pub fn event(&self, name: &str) -> Result<Subject<E>> {
        self.channel(name)
            .cloned()
            .ok_or_else(|| ViewError::UnknownEventChannel {
                name: name.to_string(),
            })
    }

    /// Declared channel names, in declaration order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    #[must_use]
    pub fn channels(&self) -> &ChannelMap<E> {
        &self.channels
    }

    /// The placeholder standing in for the Model.
    #[must_use]
    pub fn model(&self) -> &Placeholder<M> {
        &self.model
    }

    #[must_use]
    pub fn model_interface(&self) -> &Interface {
        &self.interface
    }

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Wire the real Model into this View.
    pub fn inject<C>(&self, model: &C) -> Result<()>
    where
        C: Capabilities<M> + ?Sized,
    {
        self.model.inject(model)
    }

    /// Build an independent instance of the same View definition: new
    /// channels, new placeholder, no shared state.
    pub fn clone_fresh(&self) -> Result<Self> {
        assemble(
            self.config.clone(),
            self.interface.clone(),
            Rc::clone(&self.definition),
        )
    }
}

impl<M, E: 'static> Capabilities<E> for View<M, E> {
    fn capability(&self, name: &str) -> Option<Subject<E>> {
        self.channels.get(name).cloned()
    }
}

impl<M, E> std::fmt::Debug for View<M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("model", &self.model)
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
