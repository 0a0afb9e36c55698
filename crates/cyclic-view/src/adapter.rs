#![forbid(unsafe_code)]

//! Component-specific messages for missing capabilities.
//!
//! A bare [`Placeholder`](crate::backward::Placeholder) reports missing
//! capabilities with a generic message. [`adapt_errors`] names the parties
//! involved instead, e.g. `View expects Model to have the required property
//! todos$`, both for failures raised while the definition function runs and
//! for later reads and injections.

use std::borrow::Cow;

use crate::backward::Backward;
use crate::error::{Result, ViewError};

/// Apply `prefix` to every missing-capability error of `result`.
///
/// On success the prefix is installed on the placeholder. On failure a
/// [`ViewError::MissingRequiredCapability`] is re-raised with the prefix;
/// any other error passes through unchanged.
pub fn adapt_errors<T: 'static, R>(
    result: Result<Backward<T, R>>,
    prefix: impl Into<Cow<'static, str>>,
) -> Result<Backward<T, R>> {
    let prefix = prefix.into();
    match result {
        Ok(backward) => {
            backward.placeholder().set_error_prefix(prefix);
            Ok(backward)
        }
        Err(ViewError::MissingRequiredCapability { name, .. }) => {
            Err(ViewError::missing(&prefix, name))
        }
        Err(other) => Err(other),
    }
}
