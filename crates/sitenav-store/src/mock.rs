//! Mock store implementation for testing.
//!
//! Provides [`MockStore`] for unit testing without a real site plan backend.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::asset::AssetId;
use crate::content::{AttributeSet, ContentReader};
use crate::properties::{MapProperties, SiteProperties};
use crate::store::{
    ErrorStatus, HierarchicalStore, HierarchyRow, NodeStatus, StoreError, StoreErrorKind,
};

const BACKEND: &str = "Mock";

/// Mock site plan, content repository, and property source.
///
/// Stores rows, assets, and properties in memory. Use the builder methods
/// to configure the mock with test data. Every `children` query is recorded
/// and can be inspected with [`MockStore::children_queries`].
///
/// # Example
///
/// ```ignore
/// use sitenav_store::{AssetId, AttributeSet, HierarchicalStore, MockStore};
///
/// let store = MockStore::new()
///     .with_site("FirstSite", 1)
///     .with_node(10, 1, AssetId::new("Page", 100), 0)
///     .with_asset(AttributeSet::new(AssetId::new("Page", 100)).with_text("name", "Home"));
///
/// let root = store.root_for_site("FirstSite").unwrap().unwrap();
/// let children = store.children(root.node_id).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    sites: HashMap<String, i64>,
    nodes: Vec<(HierarchyRow, NodeStatus)>,
    assets: HashMap<AssetId, AttributeSet>,
    publications: HashMap<AssetId, HashSet<String>>,
    unreadable: HashSet<AssetId>,
    unavailable_assets: HashSet<AssetId>,
    failing_parents: HashSet<i64>,
    properties: MapProperties,
    queries: Mutex<Vec<i64>>,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a site with its top-level container node.
    #[must_use]
    pub fn with_site(mut self, name: impl Into<String>, container_id: i64) -> Self {
        let name = name.into();
        self.nodes.push((
            HierarchyRow {
                node_id: container_id,
                parent_id: None,
                object_type: "Publication".to_owned(),
                object_id: container_id,
                rank: 0,
            },
            NodeStatus::Placed,
        ));
        self.sites.insert(name, container_id);
        self
    }

    /// Add a placed node under `parent_id`.
    #[must_use]
    pub fn with_node(self, node_id: i64, parent_id: i64, asset: AssetId, rank: i64) -> Self {
        self.with_node_status(node_id, parent_id, asset, rank, NodeStatus::Placed)
    }

    /// Add a node with an explicit placement status.
    #[must_use]
    pub fn with_node_status(
        mut self,
        node_id: i64,
        parent_id: i64,
        asset: AssetId,
        rank: i64,
        status: NodeStatus,
    ) -> Self {
        self.nodes.push((
            HierarchyRow {
                node_id,
                parent_id: Some(parent_id),
                object_type: asset.asset_type,
                object_id: asset.id,
                rank,
            },
            status,
        ));
        self
    }

    /// Add a content item with its attributes.
    #[must_use]
    pub fn with_asset(mut self, attributes: AttributeSet) -> Self {
        self.assets.insert(attributes.asset_id().clone(), attributes);
        self
    }

    /// Publish a content item to a site.
    #[must_use]
    pub fn with_publication(mut self, asset: AssetId, site: impl Into<String>) -> Self {
        self.publications
            .entry(asset)
            .or_default()
            .insert(site.into());
        self
    }

    /// Make attribute reads for a content item fail as if it had been deleted.
    #[must_use]
    pub fn with_unreadable_asset(mut self, asset: AssetId) -> Self {
        self.unreadable.insert(asset);
        self
    }

    /// Make attribute reads for a content item fail with a backend outage.
    #[must_use]
    pub fn with_unavailable_asset(mut self, asset: AssetId) -> Self {
        self.unavailable_assets.insert(asset);
        self
    }

    /// Make the `children` query for a parent fail with a backend outage.
    #[must_use]
    pub fn with_failing_children(mut self, parent_id: i64) -> Self {
        self.failing_parents.insert(parent_id);
        self
    }

    /// Set a site property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties = self.properties.with(key, value);
        self
    }

    /// Parent ids passed to `children`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn children_queries(&self) -> Vec<i64> {
        self.queries.lock().unwrap().clone()
    }

    fn placed(&self) -> impl Iterator<Item = &HierarchyRow> {
        self.nodes
            .iter()
            .filter(|(_, status)| *status == NodeStatus::Placed)
            .map(|(row, _)| row)
    }

    fn unavailable(subject: String) -> StoreError {
        StoreError::new(StoreErrorKind::Unavailable)
            .with_status(ErrorStatus::Temporary)
            .with_subject(subject)
            .with_backend(BACKEND)
    }
}

impl HierarchicalStore for MockStore {
    fn children(&self, parent_id: i64) -> Result<Vec<HierarchyRow>, StoreError> {
        self.queries.lock().unwrap().push(parent_id);

        if self.failing_parents.contains(&parent_id) {
            tracing::debug!(parent = parent_id, "Injected children query failure");
            return Err(Self::unavailable(format!("node {parent_id}")));
        }

        let mut rows: Vec<HierarchyRow> = self
            .placed()
            .filter(|row| row.parent_id == Some(parent_id))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.rank);
        Ok(rows)
    }

    fn root_for_site(&self, site: &str) -> Result<Option<HierarchyRow>, StoreError> {
        let Some(&container) = self.sites.get(site) else {
            return Ok(None);
        };
        Ok(self
            .placed()
            .find(|row| row.node_id == container && row.parent_id.is_none())
            .cloned())
    }

    fn node_for_page_in_site(
        &self,
        pagename: &str,
        site: &str,
    ) -> Result<Option<HierarchyRow>, StoreError> {
        let in_site = |id: &AssetId| {
            self.publications
                .get(id)
                .is_some_and(|sites| sites.contains(site))
        };
        let named = |id: &AssetId| {
            self.assets
                .get(id)
                .and_then(|attrs| attrs.as_str("name"))
                .is_some_and(|name| name == pagename)
        };

        Ok(self
            .placed()
            .filter(|row| row.parent_id.is_some())
            .filter(|row| {
                let id = row.asset_id();
                in_site(&id) && named(&id)
            })
            .min_by_key(|row| row.rank)
            .cloned())
    }
}

impl ContentReader for MockStore {
    fn read_attributes(&self, id: &AssetId, names: &[&str]) -> Result<AttributeSet, StoreError> {
        if self.unavailable_assets.contains(id) {
            tracing::debug!(asset = %id, "Injected attribute read outage");
            return Err(Self::unavailable(format!("asset {id}")));
        }
        if self.unreadable.contains(id) {
            tracing::debug!(asset = %id, "Injected unreadable asset");
            return Err(StoreError::asset_not_found(id).with_backend(BACKEND));
        }

        let Some(stored) = self.assets.get(id) else {
            let other_type = self
                .assets
                .keys()
                .any(|key| key.id == id.id && key.asset_type != id.asset_type);
            tracing::debug!(asset = %id, other_type, "Mock asset not found");
            return Err(if other_type {
                StoreError::type_mismatch(id).with_backend(BACKEND)
            } else {
                StoreError::asset_not_found(id).with_backend(BACKEND)
            });
        };

        let mut result = AttributeSet::new(id.clone());
        if let Some(subtype) = stored.subtype() {
            result = result.with_subtype(subtype);
        }
        for name in names {
            if let Some(value) = stored.get(name) {
                result.insert(*name, value.clone());
            }
        }
        Ok(result)
    }
}

impl SiteProperties for MockStore {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.property(key)
    }
}
