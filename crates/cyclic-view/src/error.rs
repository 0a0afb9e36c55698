#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewError>;

/// Prefix used when no component-specific message has been installed.
pub const DEFAULT_MISSING_PREFIX: &str =
    "Backward function expects counterpart to have the required property ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A counterpart capability was read or injected but is not available.
    #[error("{message}")]
    MissingRequiredCapability { name: String, message: String },

    /// A View was asked for an event channel it never declared.
    #[error("view declares no event channel named `{name}`")]
    UnknownEventChannel { name: String },

    /// A tree snapshot failed validation before hook rewriting.
    #[error("malformed tree snapshot at {path}: {reason}")]
    MalformedTreeSnapshot { path: String, reason: String },
}

impl ViewError {
    /// Build a missing-capability error whose message is `prefix` followed by
    /// the capability name.
    #[must_use]
    pub fn missing(prefix: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::MissingRequiredCapability {
            message: format!("{prefix}{name}"),
            name,
        }
    }

    #[must_use]
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTreeSnapshot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Name of the missing capability, if this is a missing-capability error.
    #[must_use]
    pub fn missing_capability(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredCapability { name, .. } => Some(name),
            _ => None,
        }
    }
}
