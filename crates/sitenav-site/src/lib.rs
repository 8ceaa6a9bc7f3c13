//! Navigation tree building for sitenav.
//!
//! This crate provides:
//! - [`NavigationTreeBuilder`]: depth-bounded traversal of a site plan
//! - [`NavigationNode`]: decorated tree nodes for page rendering
//! - [`UrlResolver`]: vanity/default URL construction
//!
//! # Quick Start
//!
//! ```ignore
//! use sitenav_site::{NavigationSettings, NavigationTreeBuilder, UrlResolver};
//! use sitenav_store_fs::SitePlanStore;
//!
//! let plan = SitePlanStore::open("siteplan.yaml")?;
//! let builder = NavigationTreeBuilder::new(
//!     &plan,
//!     &plan,
//!     UrlResolver::from_properties(&plan, "/cs/ContentServer", ""),
//!     NavigationSettings::default(),
//! )?;
//!
//! // Top-level pages and two levels below them
//! let roots = builder.roots_for_site("FirstSite", 2)?;
//!
//! // A single page and everything below it
//! let products = builder.node_by_name("Products", "FirstSite", -1)?;
//! ```

mod builder;
mod error;
mod node;
mod url;
mod validity;

pub use builder::{BuildReport, NavigationSettings, NavigationTreeBuilder, SkipReason, SkippedRow};
pub use error::NavError;
pub use node::{Descendants, NavigationNode};
pub use url::{DEFAULT_DISPATCHER, DEFAULT_SERVLET, DISPATCHER_PROPERTY, UrlResolver, UrlScheme};
pub use validity::{END_DATE, START_DATE, is_date_within_range};
