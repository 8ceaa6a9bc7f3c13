//! Typed content item references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a content item: asset type plus numeric id.
///
/// Every attribute read goes through this one reference type, regardless of
/// whether the item was found by name, by id, or through a site plan row.
///
/// Displays as `Type:id` (e.g., `Page:1114083739006`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId {
    /// Asset type (e.g., "Page", "Publication").
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Numeric asset id, unique within its type.
    pub id: i64,
}

impl AssetId {
    /// Create a new asset reference.
    #[must_use]
    pub fn new(asset_type: impl Into<String>, id: i64) -> Self {
        Self {
            asset_type: asset_type.into(),
            id,
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asset_type, self.id)
    }
}
