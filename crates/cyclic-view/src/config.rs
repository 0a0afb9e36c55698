#![forbid(unsafe_code)]

//! View assembly configuration.
//!
//! [`define_view`](crate::view::define_view) assembles with
//! [`ViewConfig::from_env`], so a process can switch snapshot validation off
//! through `CYCLIC_VALIDATE_VTREE` without code changes.
//! [`define_view_with`](crate::view::define_view_with) takes the
//! configuration as given.

use std::env;

/// Message prefix for capabilities a View expects from its Model.
pub const VIEW_MISSING_PREFIX: &str = "View expects Model to have the required property ";

/// Environment variable controlling [`ViewConfig::validate_snapshots`].
pub const VALIDATE_ENV: &str = "CYCLIC_VALIDATE_VTREE";

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewConfig {
    /// Prepended to the capability name in missing-capability errors.
    pub missing_capability_prefix: String,
    /// Validate each tree snapshot before rewriting; malformed snapshots are
    /// logged and not emitted.
    pub validate_snapshots: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            missing_capability_prefix: VIEW_MISSING_PREFIX.to_string(),
            validate_snapshots: true,
        }
    }
}

impl ViewConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_missing_capability_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.missing_capability_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_snapshot_validation(mut self, enabled: bool) -> Self {
        self.validate_snapshots = enabled;
        self
    }

    /// Defaults, overridden by `CYCLIC_VALIDATE_VTREE` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let validate = env::var(VALIDATE_ENV).ok();
        Self::from_env_values(validate.as_deref())
    }

    fn from_env_values(validate: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = validate {
            match parse_flag(raw) {
                Some(enabled) => config.validate_snapshots = enabled,
                None => tracing::warn!(
                    var = VALIDATE_ENV,
                    value = raw,
                    "unrecognized flag value, keeping default"
                ),
            }
        }
        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_with_view_prefix() {
        let config = ViewConfig::default();
        assert!(config.validate_snapshots);
        assert_eq!(config.missing_capability_prefix, VIEW_MISSING_PREFIX);
    }

    #[test]
    fn env_disables_validation() {
        assert!(!ViewConfig::from_env_values(Some("0")).validate_snapshots);
        assert!(!ViewConfig::from_env_values(Some(" Off ")).validate_snapshots);
    }

    #[test]
    fn env_enables_validation() {
        assert!(ViewConfig::from_env_values(Some("yes")).validate_snapshots);
    }

    #[test]
    fn env_missing_or_garbage_keeps_default() {
        assert_eq!(ViewConfig::from_env_values(None), ViewConfig::default());
        assert_eq!(
            ViewConfig::from_env_values(Some("maybe")),
            ViewConfig::default()
        );
    }

    #[test]
    fn builder_setters() {
        let config = ViewConfig::new()
            .with_missing_capability_prefix("Row expects List to have ")
            .with_snapshot_validation(false);
        assert_eq!(config.missing_capability_prefix, "Row expects List to have ");
        assert!(!config.validate_snapshots);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_with_partial_input() {
        let config: ViewConfig =
            serde_json::from_str(r#"{"validate_snapshots": false}"#).unwrap();
        assert!(!config.validate_snapshots);
        assert_eq!(config.missing_capability_prefix, VIEW_MISSING_PREFIX);

        let json = serde_json::to_string(&config).unwrap();
        let back: ViewConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
