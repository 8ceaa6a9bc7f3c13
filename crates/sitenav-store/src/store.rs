//! Hierarchical store trait, site plan rows, and error types.
//!
//! Provides the core [`HierarchicalStore`] trait for read-only queries over the
//! site plan table, along with [`StoreError`] for unified error handling across
//! backends and the [`ContentReader`](crate::ContentReader) trait.
//!
//! # Site plan table
//!
//! Each row places one content item at one position of the site tree:
//!
//! | column    | meaning                                  |
//! |-----------|------------------------------------------|
//! | node-id   | structural node id                       |
//! | parent-id | parent structural node (none for roots)  |
//! | otype     | content item type                        |
//! | oid       | content item id                          |
//! | rank      | sibling ordering key                     |
//! | status    | placement status ([`NodeStatus`])        |

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;

/// Placement status of a site plan node.
///
/// Only [`NodeStatus::Placed`] rows are ever returned by store queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Visible in the site tree.
    #[default]
    Placed,
    /// Present in the table but not part of the navigable tree.
    Unplaced,
}

/// One placed row of the site plan table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyRow {
    /// Structural node id.
    pub node_id: i64,
    /// Parent structural node id (`None` for top-level site containers).
    pub parent_id: Option<i64>,
    /// Type of the referenced content item.
    pub object_type: String,
    /// Id of the referenced content item.
    pub object_id: i64,
    /// Sibling ordering key.
    pub rank: i64,
}

impl HierarchyRow {
    /// Reference to the content item placed at this node.
    #[must_use]
    pub fn asset_id(&self) -> AssetId {
        AssetId::new(self.object_type.clone(), self.object_id)
    }
}

/// Semantic error categories shared by all store backends.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Content item or row does not exist.
    NotFound,
    /// Content item exists but has a different type than requested.
    TypeMismatch,
    /// Malformed query parameter.
    InvalidQuery,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Query timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance for callers that wrap the store.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (not found, malformed parameter).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (service unavailable).
    Persistent,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// What was being queried (e.g., "node 42", "asset Page:7").
    pub subject: Option<String>,
    /// Backend identifier (e.g., "Plan", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            subject: None,
            backend: None,
            source: None,
        }
    }

    /// Attach the queried subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error for a content item.
    #[must_use]
    pub fn asset_not_found(id: &AssetId) -> Self {
        Self::new(StoreErrorKind::NotFound).with_subject(format!("asset {id}"))
    }

    /// Create a type mismatch error for a content item.
    #[must_use]
    pub fn type_mismatch(id: &AssetId) -> Self {
        Self::new(StoreErrorKind::TypeMismatch).with_subject(format!("asset {id}"))
    }

    /// Whether the error concerns a single content item rather than the
    /// query mechanism itself.
    #[must_use]
    pub fn is_item_error(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::NotFound | StoreErrorKind::TypeMismatch
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (subject: asset Page:7)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::TypeMismatch => "Type mismatch",
            StoreErrorKind::InvalidQuery => "Invalid query",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(subject) = &self.subject {
            write!(f, " ({subject})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only queries over the site plan table.
///
/// Every query is a single bounded round trip with no retry. Implementations
/// return only rows with [`NodeStatus::Placed`] status.
pub trait HierarchicalStore: Send + Sync {
    /// Placed children of a node, ordered by ascending rank.
    ///
    /// Rows with equal rank keep the backend's natural row order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query cannot be executed.
    fn children(&self, parent_id: i64) -> Result<Vec<HierarchyRow>, StoreError>;

    /// Top-level container node for a site.
    ///
    /// Returns `Ok(None)` when the site does not exist or has no container node.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query cannot be executed.
    fn root_for_site(&self, site: &str) -> Result<Option<HierarchyRow>, StoreError>;

    /// Placed node whose content item has display name `pagename` within `site`.
    ///
    /// When several nodes qualify, the one with the lowest rank is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query cannot be executed.
    fn node_for_page_in_site(
        &self,
        pagename: &str,
        site: &str,
    ) -> Result<Option<HierarchyRow>, StoreError>;
}
