//! Navigation tree construction from the site plan.
//!
//! [`NavigationTreeBuilder`] walks the site plan depth-first, one `children`
//! query per expanded node, and decorates every placed row with the attributes
//! of the content item it references.
//!
//! # Depth
//!
//! `max_depth` counts parent-to-child hops from the queried roots (level 0).
//! A node at level `L` has its children expanded when `max_depth < 0` or
//! `L < max_depth`, so no returned node is deeper than a non-negative
//! `max_depth`.
//!
//! # Failure model
//!
//! - Rows whose content item cannot be read are skipped and logged.
//! - Rows without a template are kept without a URL.
//! - Query failures and cycles abort the whole build; no partial tree is
//!   returned.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use sitenav_store::{AssetId, ContentReader, HierarchicalStore, HierarchyRow};

use crate::error::NavError;
use crate::node::NavigationNode;
use crate::url::UrlResolver;
use crate::validity::{END_DATE, START_DATE, is_valid_on};

const NAME: &str = "name";
const SUBTYPE: &str = "subtype";
const TEMPLATE: &str = "template";

/// Attribute names and filters applied while decorating nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationSettings {
    /// Attribute holding the link label (default: `linktext`).
    pub link_label_attribute: String,
    /// Attribute holding the vanity path (default: `path`).
    pub path_attribute: String,
    /// Only place content items valid on this date (site preview).
    pub effective_date: Option<NaiveDateTime>,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            link_label_attribute: "linktext".to_owned(),
            path_attribute: "path".to_owned(),
            effective_date: None,
        }
    }
}

impl NavigationSettings {
    /// Check that attribute names are usable.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidSettings`] if an attribute name is blank.
    pub fn validate(&self) -> Result<(), NavError> {
        if self.link_label_attribute.trim().is_empty() {
            return Err(NavError::InvalidSettings(
                "link label attribute cannot be blank".to_owned(),
            ));
        }
        if self.path_attribute.trim().is_empty() {
            return Err(NavError::InvalidSettings(
                "path attribute cannot be blank".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Why a site plan row contributed no node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Content item attributes could not be read (deleted, wrong type).
    Unreadable(String),
    /// Content item is not valid on the effective date.
    OutOfDateRange,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable(message) => write!(f, "unreadable: {message}"),
            Self::OutOfDateRange => f.write_str("not valid on the effective date"),
        }
    }
}

/// Site plan row left out of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
    /// Structural node id of the row.
    pub node_id: i64,
    /// Content item the row references.
    pub asset: AssetId,
    /// Level the node would have had.
    pub level: u32,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of a build together with its diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Built nodes in rank order (at most one for a lookup by name).
    pub nodes: Vec<NavigationNode>,
    /// Rows that were skipped, in traversal order.
    pub skipped: Vec<SkippedRow>,
    /// Every content item visited, in traversal order.
    pub dependencies: Vec<AssetId>,
}

/// Outcome of decorating one row.
enum RowOutcome {
    Node(NavigationNode),
    Skipped(SkipReason),
}

/// Per-build traversal state.
#[derive(Default)]
struct Traversal {
    /// Node ids on the path from the build root to the current node.
    path: HashSet<i64>,
    skipped: Vec<SkippedRow>,
    dependencies: Vec<AssetId>,
}

impl Traversal {
    fn starting_at(node_id: i64) -> Self {
        let mut traversal = Self::default();
        traversal.path.insert(node_id);
        traversal
    }

    fn into_report(self, nodes: Vec<NavigationNode>) -> BuildReport {
        BuildReport {
            nodes,
            skipped: self.skipped,
            dependencies: self.dependencies,
        }
    }

    fn record_skip(&mut self, row: &HierarchyRow, level: u32, reason: SkipReason) {
        let asset = row.asset_id();
        match &reason {
            SkipReason::Unreadable(error) => tracing::warn!(
                node = row.node_id,
                asset = %asset,
                %error,
                "Skipping site plan node with unreadable content item"
            ),
            SkipReason::OutOfDateRange => tracing::debug!(
                node = row.node_id,
                asset = %asset,
                "Skipping site plan node outside effective date"
            ),
        }
        self.skipped.push(SkippedRow {
            node_id: row.node_id,
            asset,
            level,
            reason,
        });
    }
}

/// Builds navigation trees from a site plan session.
///
/// Borrows the store and reader for its lifetime and holds no other state,
/// so every call is an independent build. Returned trees are owned by the
/// caller.
pub struct NavigationTreeBuilder<'a> {
    store: &'a dyn HierarchicalStore,
    reader: &'a dyn ContentReader,
    urls: UrlResolver,
    settings: NavigationSettings,
}

impl<'a> NavigationTreeBuilder<'a> {
    /// Create a builder over a store session.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidSettings`] if `settings` fail validation.
    pub fn new(
        store: &'a dyn HierarchicalStore,
        reader: &'a dyn ContentReader,
        urls: UrlResolver,
        settings: NavigationSettings,
    ) -> Result<Self, NavError> {
        settings.validate()?;
        Ok(Self {
            store,
            reader,
            urls,
            settings,
        })
    }

    /// Top-level nodes of a site, expanded to `max_depth` (negative = unbounded).
    ///
    /// Returns an empty list when the site has no container node.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a store query fails or the site plan has a cycle.
    pub fn roots_for_site(
        &self,
        site: &str,
        max_depth: i32,
    ) -> Result<Vec<NavigationNode>, NavError> {
        Ok(self.roots_for_site_with_report(site, max_depth)?.nodes)
    }

    /// Top-level nodes of a site, expanded without a depth bound.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a store query fails or the site plan has a cycle.
    pub fn roots_for_site_unbounded(&self, site: &str) -> Result<Vec<NavigationNode>, NavError> {
        self.roots_for_site(site, -1)
    }

    /// Like [`roots_for_site`](Self::roots_for_site), also reporting skipped
    /// rows and visited content items.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a store query fails or the site plan has a cycle.
    pub fn roots_for_site_with_report(
        &self,
        site: &str,
        max_depth: i32,
    ) -> Result<BuildReport, NavError> {
        let Some(container) = self.store.root_for_site(site)? else {
            tracing::debug!(site, "No root site plan nodes found for site");
            return Ok(BuildReport::default());
        };

        let mut traversal = Traversal::starting_at(container.node_id);
        let nodes = self.expand_level(container.node_id, 0, max_depth, &mut traversal)?;
        if nodes.is_empty() {
            tracing::debug!(site, "Site has no placed root nodes");
        }
        Ok(traversal.into_report(nodes))
    }

    /// Node whose content item is named `pagename` within `site`, expanded
    /// as a root to `max_depth` (negative = unbounded).
    ///
    /// Returns `None` when no such node exists or its content item cannot be
    /// placed.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a store query fails or the site plan has a cycle.
    pub fn node_by_name(
        &self,
        pagename: &str,
        site: &str,
        max_depth: i32,
    ) -> Result<Option<NavigationNode>, NavError> {
        let report = self.node_by_name_with_report(pagename, site, max_depth)?;
        Ok(report.nodes.into_iter().next())
    }

    /// Like [`node_by_name`](Self::node_by_name), also reporting skipped rows
    /// and visited content items.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a store query fails or the site plan has a cycle.
    pub fn node_by_name_with_report(
        &self,
        pagename: &str,
        site: &str,
        max_depth: i32,
    ) -> Result<BuildReport, NavError> {
        let Some(row) = self.store.node_for_page_in_site(pagename, site)? else {
            tracing::debug!(site, pagename, "No site plan node found for page");
            return Ok(BuildReport::default());
        };

        let mut traversal = Traversal::default();
        let nodes = match self.visit(&row, 0, max_depth, &mut traversal)? {
            RowOutcome::Node(node) => vec![node],
            RowOutcome::Skipped(reason) => {
                traversal.record_skip(&row, 0, reason);
                Vec::new()
            }
        };
        Ok(traversal.into_report(nodes))
    }

    /// Children of `node_id`, a node at `level`, decorated at `level + 1` and
    /// expanded to `max_depth` (negative = unbounded).
    ///
    /// Levels saturate at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] if a store query fails or the site plan has a cycle.
    pub fn expand_children(
        &self,
        node_id: i64,
        level: u32,
        max_depth: i32,
    ) -> Result<Vec<NavigationNode>, NavError> {
        let mut traversal = Traversal::starting_at(node_id);
        self.expand_level(node_id, level.saturating_add(1), max_depth, &mut traversal)
    }

    /// Decorate the children of `parent_id` as nodes at `level`.
    fn expand_level(
        &self,
        parent_id: i64,
        level: u32,
        max_depth: i32,
        traversal: &mut Traversal,
    ) -> Result<Vec<NavigationNode>, NavError> {
        let rows = self.store.children(parent_id)?;
        let mut nodes = Vec::with_capacity(rows.len());

        for row in &rows {
            match self.visit(row, level, max_depth, traversal)? {
                RowOutcome::Node(node) if node.page.is_some() => nodes.push(node),
                RowOutcome::Node(_) => {}
                RowOutcome::Skipped(reason) => traversal.record_skip(row, level, reason),
            }
        }

        Ok(nodes)
    }

    /// Decorate one row and expand its children under the depth rule.
    fn visit(
        &self,
        row: &HierarchyRow,
        level: u32,
        max_depth: i32,
        traversal: &mut Traversal,
    ) -> Result<RowOutcome, NavError> {
        if !traversal.path.insert(row.node_id) {
            return Err(NavError::Cycle {
                node_id: row.node_id,
            });
        }

        let outcome = match self.decorate(row, level, traversal)? {
            RowOutcome::Node(mut node) if descends(level, max_depth) => {
                node.children =
                    self.expand_level(row.node_id, level.saturating_add(1), max_depth, traversal)?;
                RowOutcome::Node(node)
            }
            outcome => outcome,
        };

        traversal.path.remove(&row.node_id);
        Ok(outcome)
    }

    /// Build the node for a row from its content item attributes.
    fn decorate(
        &self,
        row: &HierarchyRow,
        level: u32,
        traversal: &mut Traversal,
    ) -> Result<RowOutcome, NavError> {
        let page = row.asset_id();
        traversal.dependencies.push(page.clone());

        let link_label = self.settings.link_label_attribute.as_str();
        let path_attribute = self.settings.path_attribute.as_str();
        let mut names = vec![NAME, SUBTYPE, TEMPLATE, path_attribute, link_label];
        if self.settings.effective_date.is_some() {
            names.extend([START_DATE, END_DATE]);
        }

        let attributes = match self.reader.read_attributes(&page, &names) {
            Ok(attributes) => attributes,
            Err(e) if e.is_item_error() => {
                return Ok(RowOutcome::Skipped(SkipReason::Unreadable(e.to_string())));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(date) = self.settings.effective_date
            && !is_valid_on(&attributes, date)
        {
            return Ok(RowOutcome::Skipped(SkipReason::OutOfDateRange));
        }

        let pagename = attributes.as_str(NAME).unwrap_or_default().to_owned();
        let subtype = attributes
            .subtype()
            .or_else(|| attributes.as_str(SUBTYPE))
            .unwrap_or_default()
            .to_owned();
        let url = self.urls.resolve(
            &page,
            attributes.as_str(TEMPLATE).unwrap_or_default(),
            attributes.as_str(path_attribute).unwrap_or_default(),
        );
        let linktext = attributes
            .as_str(link_label)
            .filter(|text| !text.trim().is_empty())
            .map_or_else(|| pagename.clone(), str::to_owned);

        Ok(RowOutcome::Node(NavigationNode {
            id: attributes.asset_id().clone(),
            page: Some(page),
            level,
            subtype,
            pagename,
            url,
            linktext,
            children: Vec::new(),
        }))
    }
}

/// Whether a node at `level` has its children expanded.
fn descends(level: u32, max_depth: i32) -> bool {
    max_depth < 0 || i64::from(level) < i64::from(max_depth)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use sitenav_store::{AttributeSet, MockStore, NodeStatus};

    use super::*;
    use crate::url::{DISPATCHER_PROPERTY, UrlScheme};

    fn page(id: i64) -> AssetId {
        AssetId::new("Page", id)
    }

    fn asset(id: i64, name: &str, template: &str, path: &str) -> AttributeSet {
        AttributeSet::new(page(id))
            .with_subtype("Section")
            .with_text("name", name)
            .with_text("template", template)
            .with_text("path", path)
    }

    /// FirstSite (1)
    /// ├── Home (10, rank 0)        template + path
    /// ├── Products (11, rank 1)    template only
    /// │   ├── Gadgets (21, rank 0)
    /// │   └── Widgets (20, rank 1)
    /// │       └── Blue Widget (30)
    /// └── About (12, rank 2)       no template
    fn site() -> MockStore {
        MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_node(11, 1, page(101), 1)
            .with_node(12, 1, page(102), 2)
            .with_node(20, 11, page(200), 1)
            .with_node(21, 11, page(201), 0)
            .with_node(30, 20, page(300), 0)
            .with_asset(asset(100, "Home", "Layout", "/home"))
            .with_asset(asset(101, "Products", "Layout", ""))
            .with_asset(asset(102, "About", "", "/about"))
            .with_asset(asset(200, "Widgets", "Layout", "/products/widgets"))
            .with_asset(asset(201, "Gadgets", "Layout", "/products/gadgets"))
            .with_asset(asset(300, "Blue Widget", "Layout", "/products/widgets/blue"))
            .with_publication(page(100), "FirstSite")
            .with_publication(page(101), "FirstSite")
            .with_publication(page(200), "FirstSite")
    }

    fn builder(store: &MockStore) -> NavigationTreeBuilder<'_> {
        NavigationTreeBuilder::new(
            store,
            store,
            UrlResolver::default(),
            NavigationSettings::default(),
        )
        .unwrap()
    }

    fn names(nodes: &[NavigationNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.pagename.as_str()).collect()
    }

    fn assert_levels(node: &NavigationNode) {
        for child in &node.children {
            assert_eq!(child.level, node.level + 1);
            assert_levels(child);
        }
    }

    #[test]
    fn test_roots_for_site_rank_order() {
        let store = site();

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(names(&roots), vec!["Home", "Products", "About"]);
        assert!(roots.iter().all(|n| n.level == 0 && n.is_leaf()));
    }

    #[test]
    fn test_roots_for_site_depth_zero_queries_only_roots() {
        let store = site();

        builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(store.children_queries(), vec![1]);
    }

    #[test]
    fn test_roots_for_site_depth_one() {
        let store = site();

        let roots = builder(&store).roots_for_site("FirstSite", 1).unwrap();

        assert_eq!(names(&roots[1].children), vec!["Gadgets", "Widgets"]);
        assert!(roots[1].children.iter().all(|n| n.level == 1 && n.is_leaf()));
    }

    #[test]
    fn test_roots_for_site_unbounded() {
        let store = site();

        let roots = builder(&store).roots_for_site_unbounded("FirstSite").unwrap();

        let widgets = &roots[1].children[1];
        assert_eq!(names(&widgets.children), vec!["Blue Widget"]);
        assert_eq!(widgets.children[0].level, 2);
        roots.iter().for_each(assert_levels);
    }

    #[test]
    fn test_no_node_deeper_than_max_depth() {
        let store = site();

        for max_depth in 0..4 {
            let roots = builder(&store).roots_for_site("FirstSite", max_depth).unwrap();
            let deepest = roots.iter().map(NavigationNode::max_level).max().unwrap();
            assert!(i64::from(deepest) <= i64::from(max_depth));
        }
    }

    #[test]
    fn test_roots_for_site_without_roots() {
        let store = site();

        let roots = builder(&store)
            .roots_for_site("site-with-no-roots", 3)
            .unwrap();

        assert!(roots.is_empty());
    }

    #[test]
    fn test_roots_for_site_empty_container() {
        let store = MockStore::new().with_site("EmptySite", 1);

        let roots = builder(&store).roots_for_site("EmptySite", -1).unwrap();

        assert!(roots.is_empty());
    }

    #[test]
    fn test_decoration() {
        let store = site();

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();
        let home = &roots[0];

        assert_eq!(home.id, page(100));
        assert_eq!(home.page, Some(page(100)));
        assert_eq!(home.subtype, "Section");
        assert_eq!(home.pagename, "Home");
        assert_eq!(home.linktext, "Home");
        assert_eq!(
            home.url.as_deref(),
            Some("/home?pagename=GST/Dispatcher&childpagename=Layout&c=Page&cid=100")
        );
    }

    #[test]
    fn test_url_forms() {
        let store = site();

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert!(roots[0].url.as_deref().unwrap().starts_with("/home?"));
        assert_eq!(
            roots[1].url.as_deref(),
            Some("/cs/ContentServer?pagename=Layout&c=Page&cid=101")
        );
        assert_eq!(roots[2].url, None);
    }

    #[test]
    fn test_linktext_attribute() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_asset(asset(100, "Home", "Layout", "").with_text("linktext", "Start here"));

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots[0].linktext, "Start here");
        assert_eq!(roots[0].pagename, "Home");
    }

    #[test]
    fn test_blank_linktext_falls_back_to_pagename() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_asset(asset(100, "Home", "Layout", "").with_text("linktext", "  "));

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots[0].linktext, "Home");
    }

    #[test]
    fn test_custom_attribute_names() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_asset(
                AttributeSet::new(page(100))
                    .with_text("name", "Home")
                    .with_text("template", "Layout")
                    .with_text("label", "Welcome")
                    .with_text("vanity", "/welcome"),
            );
        let settings = NavigationSettings {
            link_label_attribute: "label".to_owned(),
            path_attribute: "vanity".to_owned(),
            effective_date: None,
        };
        let builder =
            NavigationTreeBuilder::new(&store, &store, UrlResolver::default(), settings).unwrap();

        let roots = builder.roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots[0].linktext, "Welcome");
        assert!(roots[0].url.as_deref().unwrap().starts_with("/welcome?"));
    }

    #[test]
    fn test_blank_settings_rejected() {
        let store = MockStore::new();
        let settings = NavigationSettings {
            path_attribute: " ".to_owned(),
            ..NavigationSettings::default()
        };

        let result = NavigationTreeBuilder::new(&store, &store, UrlResolver::default(), settings);

        assert!(matches!(result, Err(NavError::InvalidSettings(_))));
    }

    #[test]
    fn test_missing_name_keeps_node() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_asset(AttributeSet::new(page(100)).with_text("template", "Layout"));

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].pagename, "");
        assert_eq!(roots[0].linktext, "");
        assert_eq!(roots[0].subtype, "");
    }

    #[test]
    fn test_subtype_attribute_fallback() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_asset(
                AttributeSet::new(page(100))
                    .with_text("name", "Home")
                    .with_text("subtype", "Landing"),
            );

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots[0].subtype, "Landing");
    }

    #[test]
    fn test_expand_children_scenario() {
        let store = MockStore::new()
            .with_node(2, 1, page(50), 0)
            .with_node(3, 2, page(51), 0)
            .with_node(4, 2, page(52), 1)
            .with_node(5, 3, page(53), 0)
            .with_asset(asset(51, "A", "T", "/a"))
            .with_asset(asset(52, "B", "", ""))
            .with_asset(asset(53, "A child", "T", ""));

        let children = builder(&store).expand_children(2, 0, 1).unwrap();

        assert_eq!(names(&children), vec!["A", "B"]);
        assert_eq!(
            children[0].url.as_deref(),
            Some("/a?pagename=GST/Dispatcher&childpagename=T&c=Page&cid=51")
        );
        assert_eq!(children[1].url, None);
        assert!(children.iter().all(|n| n.level == 1 && n.is_leaf()));
    }

    #[test]
    fn test_expand_children_at_max_level() {
        let store = site();

        let children = builder(&store).expand_children(11, u32::MAX, 0).unwrap();

        assert_eq!(names(&children), vec!["Gadgets", "Widgets"]);
        assert!(children.iter().all(|n| n.level == u32::MAX && n.children.is_empty()));
    }

    #[test]
    fn test_expand_children_at_max_level_unbounded() {
        let store = site();

        let children = builder(&store).expand_children(11, u32::MAX - 1, -1).unwrap();

        assert_eq!(children[1].level, u32::MAX);
        assert_eq!(children[1].children[0].level, u32::MAX);
    }

    #[test]
    fn test_unreadable_child_skipped() {
        let store = site().with_unreadable_asset(page(200));

        let report = builder(&store)
            .roots_for_site_with_report("FirstSite", -1)
            .unwrap();

        let products = &report.nodes[1];
        assert_eq!(names(&products.children), vec!["Gadgets"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].node_id, 20);
        assert_eq!(report.skipped[0].level, 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::Unreadable(_)));
        // Skipped rows are not expanded
        assert!(!store.children_queries().contains(&20));
    }

    #[test]
    fn test_missing_asset_skipped() {
        let store = site().with_node(13, 1, page(999), 3);

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(names(&roots), vec!["Home", "Products", "About"]);
    }

    #[test]
    fn test_type_mismatch_skipped() {
        let store = site().with_node(13, 1, AssetId::new("Article", 100), 3);

        let report = builder(&store)
            .roots_for_site_with_report("FirstSite", 0)
            .unwrap();

        assert_eq!(report.nodes.len(), 3);
        assert_eq!(report.skipped[0].asset, AssetId::new("Article", 100));
    }

    #[test]
    fn test_unplaced_rows_excluded() {
        let store = site().with_node_status(13, 1, page(100), 3, NodeStatus::Unplaced);

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn test_rank_ties_keep_store_order() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 1)
            .with_node(11, 1, page(101), 1)
            .with_node(12, 1, page(102), 0)
            .with_asset(asset(100, "First", "", ""))
            .with_asset(asset(101, "Second", "", ""))
            .with_asset(asset(102, "Zero", "", ""));

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(names(&roots), vec!["Zero", "First", "Second"]);
    }

    #[test]
    fn test_store_failure_aborts_build() {
        let store = site().with_failing_children(20);

        let result = builder(&store).roots_for_site("FirstSite", -1);

        assert!(matches!(result, Err(NavError::Store(_))));
    }

    #[test]
    fn test_reader_outage_aborts_build() {
        let store = site().with_unavailable_asset(page(201));

        let result = builder(&store).roots_for_site("FirstSite", -1);

        assert!(matches!(result, Err(NavError::Store(_))));
    }

    #[test]
    fn test_store_failure_beyond_depth_not_reached() {
        let store = site().with_failing_children(20);

        let roots = builder(&store).roots_for_site("FirstSite", 1).unwrap();

        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn test_cycle_detected() {
        // Blue Widget (30) lists Products (11) as its own child
        let store = site().with_node(11, 30, page(101), 0);

        let result = builder(&store).roots_for_site("FirstSite", -1);

        assert!(matches!(result, Err(NavError::Cycle { node_id: 11 })));
    }

    #[test]
    fn test_self_loop_detected() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_node(10, 10, page(100), 0)
            .with_asset(asset(100, "Home", "", ""));

        let result = builder(&store).roots_for_site("FirstSite", 5);

        assert!(matches!(result, Err(NavError::Cycle { node_id: 10 })));
    }

    #[test]
    fn test_shared_subtree_is_not_a_cycle() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_node(11, 1, page(101), 1)
            .with_node(20, 10, page(200), 0)
            .with_node(20, 11, page(200), 0)
            .with_asset(asset(100, "Left", "", ""))
            .with_asset(asset(101, "Right", "", ""))
            .with_asset(asset(200, "Shared", "", ""));

        let roots = builder(&store).roots_for_site("FirstSite", -1).unwrap();

        assert_eq!(names(&roots[0].children), vec!["Shared"]);
        assert_eq!(names(&roots[1].children), vec!["Shared"]);
    }

    #[test]
    fn test_node_by_name() {
        let store = site();

        let node = builder(&store)
            .node_by_name("Products", "FirstSite", 1)
            .unwrap()
            .unwrap();

        assert_eq!(node.level, 0);
        assert_eq!(node.pagename, "Products");
        assert_eq!(names(&node.children), vec!["Gadgets", "Widgets"]);
        assert!(node.children.iter().all(|n| n.level == 1 && n.is_leaf()));
    }

    #[test]
    fn test_node_by_name_depth_zero() {
        let store = site();

        let node = builder(&store)
            .node_by_name("Widgets", "FirstSite", 0)
            .unwrap()
            .unwrap();

        assert!(node.is_leaf());
        assert!(store.children_queries().is_empty());
    }

    #[test]
    fn test_node_by_name_nonexistent() {
        let store = site();

        let node = builder(&store)
            .node_by_name("nonexistent-page", "site", 2)
            .unwrap();

        assert!(node.is_none());
    }

    #[test]
    fn test_node_by_name_unreadable_is_absent() {
        let store = site().with_unreadable_asset(page(101));

        let report = builder(&store)
            .node_by_name_with_report("Products", "FirstSite", 1)
            .unwrap();

        assert!(report.nodes.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].node_id, 11);
    }

    #[test]
    fn test_dependencies_in_visit_order() {
        let store = site();

        let report = builder(&store)
            .roots_for_site_with_report("FirstSite", -1)
            .unwrap();

        let ids: Vec<i64> = report.dependencies.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![100, 101, 201, 200, 300, 102]);
    }

    #[test]
    fn test_effective_date_filter() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_node(11, 1, page(101), 1)
            .with_node(12, 1, page(102), 2)
            .with_asset(asset(100, "Always", "", ""))
            .with_asset(asset(101, "Expired", "", "").with_text("enddate", "2020-01-01 00:00:00"))
            .with_asset(
                asset(102, "Upcoming", "", "").with_text("startdate", "2030-01-01 00:00:00"),
            );
        let settings = NavigationSettings {
            effective_date: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0),
            ..NavigationSettings::default()
        };
        let builder =
            NavigationTreeBuilder::new(&store, &store, UrlResolver::default(), settings).unwrap();

        let report = builder.roots_for_site_with_report("FirstSite", 0).unwrap();

        assert_eq!(names(&report.nodes), vec!["Always"]);
        assert_eq!(report.skipped.len(), 2);
        assert!(
            report
                .skipped
                .iter()
                .all(|s| s.reason == SkipReason::OutOfDateRange)
        );
    }

    #[test]
    fn test_dates_ignored_without_effective_date() {
        let store = MockStore::new()
            .with_site("FirstSite", 1)
            .with_node(10, 1, page(100), 0)
            .with_asset(asset(100, "Expired", "", "").with_text("enddate", "2020-01-01 00:00:00"));

        let roots = builder(&store).roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_dispatcher_from_store_properties() {
        let store = site().with_property(DISPATCHER_PROPERTY, "Site/Wrapper");
        let urls = UrlResolver::from_properties(&store, "/cs/ContentServer", "");
        let builder =
            NavigationTreeBuilder::new(&store, &store, urls, NavigationSettings::default())
                .unwrap();

        let roots = builder.roots_for_site("FirstSite", 0).unwrap();

        assert!(
            roots[0]
                .url
                .as_deref()
                .unwrap()
                .contains("pagename=Site/Wrapper")
        );
    }

    #[test]
    fn test_custom_url_scheme() {
        let store = site();
        let urls = UrlResolver::new(UrlScheme {
            servlet: "/servlet/Satellite".to_owned(),
            ..UrlScheme::default()
        });
        let builder =
            NavigationTreeBuilder::new(&store, &store, urls, NavigationSettings::default())
                .unwrap();

        let roots = builder.roots_for_site("FirstSite", 0).unwrap();

        assert_eq!(
            roots[1].url.as_deref(),
            Some("/servlet/Satellite?pagename=Layout&c=Page&cid=101")
        );
    }

    #[test]
    fn test_descends() {
        assert!(descends(0, -1));
        assert!(descends(100, -1));
        assert!(!descends(0, 0));
        assert!(descends(0, 1));
        assert!(!descends(1, 1));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::Unreadable("[Mock] Not found (asset Page:9)".to_owned()).to_string(),
            "unreadable: [Mock] Not found (asset Page:9)"
        );
        assert_eq!(
            SkipReason::OutOfDateRange.to_string(),
            "not valid on the effective date"
        );
    }
}
