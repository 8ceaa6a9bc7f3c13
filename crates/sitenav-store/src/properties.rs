//! Site-level property lookup.

use std::collections::HashMap;

/// Site-level configuration properties.
pub trait SiteProperties: Send + Sync {
    /// Raw property value, `None` when unset.
    fn property(&self, key: &str) -> Option<String>;

    /// Property value, or `default` when the property is unset or blank.
    fn get_property(&self, key: &str, default: &str) -> String {
        self.property(key)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default.to_owned())
    }
}

/// Properties backed by an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct MapProperties {
    values: HashMap<String, String>,
}

impl MapProperties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl From<HashMap<String, String>> for MapProperties {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl SiteProperties for MapProperties {
    fn property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
