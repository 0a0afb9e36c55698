#![forbid(unsafe_code)]

//! cyclic public facade.
//!
//! Re-exports the reactive runtime and the view layer, plus a [`prelude`] for
//! application code.

pub use cyclic_runtime as runtime;
pub use cyclic_view as view;

pub use cyclic_runtime::{Stream, Subject, Subscription, SubscriptionScope};
pub use cyclic_view::{
    Backward, Capabilities, Handler, Hook, HookValue, Interface, Outputs, Placeholder, Result,
    VNode, VTree, View, ViewConfig, ViewDefinition, ViewError, adapt_errors, define_view,
    define_view_with,
};

pub mod prelude {
    //! Everything needed to define, wire, and render a View.

    pub use cyclic_runtime::{Stream, Subject, Subscription, SubscriptionScope};
    pub use cyclic_view::{
        Backward, Capabilities, Interface, Outputs, Placeholder, VNode, VTree, View, ViewConfig,
        ViewDefinition, ViewError, adapt_errors, define_view, define_view_with,
    };
}
