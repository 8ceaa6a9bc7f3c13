//! Navigation build errors.

use sitenav_store::StoreError;

/// Error that aborts a navigation build.
///
/// Row-level problems (unreadable content items, missing templates) never
/// surface here; they are recovered during traversal.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Site plan query or attribute read mechanism failed.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
    /// Node reached again from one of its own descendants.
    #[error("Cycle in site plan at node {node_id}")]
    Cycle {
        /// Node that closes the cycle.
        node_id: i64,
    },
    /// Builder settings rejected at construction.
    #[error("Invalid navigation settings: {0}")]
    InvalidSettings(String),
}
