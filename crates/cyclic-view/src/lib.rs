#![forbid(unsafe_code)]

//! Circular Model↔View binding for cyclic.
//!
//! - [`backward`]: placeholders that let two components be built before
//!   either exists, then cross-wired.
//! - [`adapter`]: component-specific missing-capability messages.
//! - [`vtree`]: tree snapshots with symbolic event hooks.
//! - [`rewrite`]: binds hooks to event channels.
//! - [`view`]: [`define_view`], the entry point tying the above together.

pub mod adapter;
pub mod backward;
pub mod config;
pub mod error;
pub mod rewrite;
pub mod view;
pub mod vtree;

pub use adapter::adapt_errors;
pub use backward::{Backward, Capabilities, Interface, Outputs, Placeholder};
pub use config::ViewConfig;
pub use error::{Result, ViewError};
pub use rewrite::{ChannelMap, RewriteReport, rewrite};
pub use view::{View, ViewDefinition, define_view, define_view_with};
pub use vtree::{Handler, Hook, HookValue, Hooks, VNode, VTree};
