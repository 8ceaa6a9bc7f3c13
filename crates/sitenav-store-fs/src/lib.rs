//! YAML site plan backend for sitenav.
//!
//! This crate provides [`SitePlanStore`], a file-based implementation of the
//! [`HierarchicalStore`], [`ContentReader`], and [`SiteProperties`] traits.
//! The whole plan is loaded once into memory and served read-only, so one
//! store can back any number of concurrent builds.
//!
//! # Plan format
//!
//! ```yaml
//! properties:
//!   com.fatwire.gst.foundation.url.wrapathassembler.dispatcher: GST/Dispatcher
//! sites:
//!   - name: FirstSite
//!     node: 1
//! nodes:
//!   - { id: 1, type: Publication, oid: 1 }
//!   - { id: 10, parent: 1, type: Page, oid: 100, rank: 0 }
//!   - { id: 11, parent: 1, type: Page, oid: 101, rank: 1, status: unplaced }
//! assets:
//!   - type: Page
//!     id: 100
//!     subtype: Section
//!     sites: [FirstSite]
//!     attributes:
//!       name: Home
//!       template: Layout
//!       path: /home
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sitenav_store::HierarchicalStore;
//! use sitenav_store_fs::SitePlanStore;
//!
//! let plan = SitePlanStore::open("siteplan.yaml")?;
//! let root = plan.root_for_site("FirstSite")?;
//! ```

mod plan;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use sitenav_store::{
    AssetId, AttributeSet, ContentReader, HierarchicalStore, HierarchyRow, MapProperties,
    NodeStatus, SiteProperties, StoreError,
};

use plan::{PlanAsset, PlanNode};

/// Backend identifier for error messages.
const BACKEND: &str = "Plan";

/// Error loading a site plan file.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Plan file could not be read.
    #[error("Failed to read site plan {}: {source}", path.display())]
    Io {
        /// Plan file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Plan file is not valid YAML or does not match the schema.
    #[error("Site plan parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Plan content is inconsistent.
    #[error("Invalid site plan: {0}")]
    Invalid(String),
}

/// Site plan loaded from a YAML file.
#[derive(Debug)]
pub struct SitePlanStore {
    sites: HashMap<String, i64>,
    nodes: Vec<PlanNode>,
    by_id: HashMap<i64, usize>,
    /// Placed children per parent, ordered by rank (file order on ties).
    children: HashMap<i64, Vec<usize>>,
    assets: HashMap<AssetId, PlanAsset>,
    properties: MapProperties,
}

impl SitePlanStore {
    /// Load a site plan from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if the file cannot be read, parsed, or validated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            sites = store.sites.len(),
            nodes = store.nodes.len(),
            assets = store.assets.len(),
            "Loaded site plan"
        );
        Ok(store)
    }

    /// Load a site plan from YAML content.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if the content cannot be parsed or validated.
    pub fn from_yaml(content: &str) -> Result<Self, PlanError> {
        let file = plan::parse(content)?;

        let nodes: Vec<PlanNode> = file.nodes.into_iter().map(|n| n.into_node()).collect();

        let mut by_id = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if by_id.insert(node.row.node_id, idx).is_some() {
                return Err(PlanError::Invalid(format!(
                    "duplicate node id {}",
                    node.row.node_id
                )));
            }
        }

        let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if node.status != NodeStatus::Placed {
                continue;
            }
            if let Some(parent) = node.row.parent_id {
                if !by_id.contains_key(&parent) {
                    tracing::warn!(
                        node = node.row.node_id,
                        parent,
                        "Site plan node references a missing parent"
                    );
                }
                children.entry(parent).or_default().push(idx);
            }
        }
        for indices in children.values_mut() {
            // Stable sort keeps file order among equal ranks
            indices.sort_by_key(|&idx| nodes[idx].row.rank);
        }

        let mut sites = HashMap::with_capacity(file.sites.len());
        for site in file.sites {
            if !by_id.contains_key(&site.node) {
                return Err(PlanError::Invalid(format!(
                    "site '{}' references missing node {}",
                    site.name, site.node
                )));
            }
            sites.insert(site.name, site.node);
        }

        let mut assets = HashMap::with_capacity(file.assets.len());
        for entry in file.assets {
            let asset = entry.into_asset()?;
            let id = asset.attributes.asset_id().clone();
            if assets.insert(id.clone(), asset).is_some() {
                return Err(PlanError::Invalid(format!("duplicate asset {id}")));
            }
        }

        Ok(Self {
            sites,
            nodes,
            by_id,
            children,
            assets,
            properties: MapProperties::from(file.properties),
        })
    }

    /// Names of the sites in this plan.
    pub fn site_names(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }

    fn row(&self, idx: usize) -> HierarchyRow {
        self.nodes[idx].row.clone()
    }
}

impl HierarchicalStore for SitePlanStore {
    fn children(&self, parent_id: i64) -> Result<Vec<HierarchyRow>, StoreError> {
        Ok(self
            .children
            .get(&parent_id)
            .map(|indices| indices.iter().map(|&idx| self.row(idx)).collect())
            .unwrap_or_default())
    }

    fn root_for_site(&self, site: &str) -> Result<Option<HierarchyRow>, StoreError> {
        Ok(self
            .sites
            .get(site)
            .and_then(|node_id| self.by_id.get(node_id))
            .filter(|&&idx| self.nodes[idx].status == NodeStatus::Placed)
            .map(|&idx| self.row(idx)))
    }

    fn node_for_page_in_site(
        &self,
        pagename: &str,
        site: &str,
    ) -> Result<Option<HierarchyRow>, StoreError> {
        let is_match = |node: &PlanNode| {
            node.status == NodeStatus::Placed
                && node.row.parent_id.is_some()
                && self.assets.get(&node.row.asset_id()).is_some_and(|asset| {
                    asset.sites.contains(site) && asset.attributes.as_str("name") == Some(pagename)
                })
        };

        Ok(self
            .nodes
            .iter()
            .filter(|node| is_match(node))
            .min_by_key(|node| node.row.rank)
            .map(|node| node.row.clone()))
    }
}

impl ContentReader for SitePlanStore {
    fn read_attributes(&self, id: &AssetId, names: &[&str]) -> Result<AttributeSet, StoreError> {
        let Some(asset) = self.assets.get(id) else {
            let other_type = self
                .assets
                .keys()
                .any(|key| key.id == id.id && key.asset_type != id.asset_type);
            return Err(if other_type {
                StoreError::type_mismatch(id).with_backend(BACKEND)
            } else {
                StoreError::asset_not_found(id).with_backend(BACKEND)
            });
        };

        let requested: HashSet<&str> = names.iter().copied().collect();
        let stored = &asset.attributes;
        let mut result = AttributeSet::new(id.clone());
        if let Some(subtype) = stored.subtype() {
            result = result.with_subtype(subtype);
        }
        for name in requested {
            if let Some(value) = stored.get(name) {
                result.insert(name, value.clone());
            }
        }
        Ok(result)
    }
}

impl SiteProperties for SitePlanStore {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.property(key)
    }
}
