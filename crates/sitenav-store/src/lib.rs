//! Site plan and content access for sitenav.
//!
//! This crate defines the collaborators the navigation builder reads from:
//!
//! - [`HierarchicalStore`]: parametrized, read-only queries over the site plan
//!   table (`node-id`, `parent-id`, `object-type`, `object-id`, `rank`, `status`)
//! - [`ContentReader`]: named attribute reads for a content item ([`AssetId`])
//! - [`SiteProperties`]: site-level property lookup
//!
//! Backends live in their own crates (`sitenav-store-fs`). [`MockStore`] is an
//! in-memory implementation for tests (behind the `mock` feature flag).
//!
//! # Example
//!
//! ```ignore
//! use sitenav_store::{AssetId, ContentReader, HierarchicalStore};
//!
//! let store = open_store()?;
//! if let Some(root) = store.root_for_site("FirstSite")? {
//!     for row in store.children(root.node_id)? {
//!         let attrs = store.read_attributes(&row.asset_id(), &["name"])?;
//!         println!("{}: {:?}", row.rank, attrs.as_str("name"));
//!     }
//! }
//! ```

mod asset;
mod content;
#[cfg(feature = "mock")]
mod mock;
mod properties;
mod store;

pub use asset::AssetId;
pub use content::{AttributeSet, AttributeValue, ContentReader, parse_jdbc_date};
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use properties::{MapProperties, SiteProperties};
pub use store::{
    ErrorStatus, HierarchicalStore, HierarchyRow, NodeStatus, StoreError, StoreErrorKind,
};
