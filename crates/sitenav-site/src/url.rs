//! Navigable URL construction for site plan nodes.
//!
//! A node is linked through one of two forms:
//!
//! - **vanity**: path-based, routed through a dispatcher page
//!   (`/products/widgets?pagename=GST/Dispatcher&childpagename=Layout&c=Page&cid=7`)
//! - **default**: template-keyed servlet URL
//!   (`/cs/ContentServer?pagename=Layout&c=Page&cid=7`)
//!
//! The vanity form is used when the content item has a path, the default form
//! when it only has a template, and no URL at all when the template is blank.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sitenav_store::{AssetId, SiteProperties};

/// Site property naming the vanity URL dispatcher page.
pub const DISPATCHER_PROPERTY: &str = "com.fatwire.gst.foundation.url.wrapathassembler.dispatcher";

/// Dispatcher page used when [`DISPATCHER_PROPERTY`] is unset.
pub const DEFAULT_DISPATCHER: &str = "GST/Dispatcher";

/// Servlet path used for default-form URLs.
pub const DEFAULT_SERVLET: &str = "/cs/ContentServer";

/// RFC 3986 unreserved characters: A-Z a-z 0-9 - . _ ~
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Unreserved characters plus `/`, which page names use as a separator.
const QUERY_VALUE: &AsciiSet = &PATH_SEGMENT.remove(b'/');

/// URL layout shared by every node of a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlScheme {
    /// Servlet path for default-form URLs.
    pub servlet: String,
    /// Prefix prepended to vanity paths (empty for site root).
    pub vanity_prefix: String,
    /// Dispatcher page that resolves vanity paths.
    pub dispatcher: String,
}

impl Default for UrlScheme {
    fn default() -> Self {
        Self {
            servlet: DEFAULT_SERVLET.to_owned(),
            vanity_prefix: String::new(),
            dispatcher: DEFAULT_DISPATCHER.to_owned(),
        }
    }
}

/// Resolves node URLs with the vanity → default → none fallback.
#[derive(Clone, Debug, Default)]
pub struct UrlResolver {
    scheme: UrlScheme,
}

impl UrlResolver {
    /// Create a resolver for a URL scheme.
    #[must_use]
    pub fn new(scheme: UrlScheme) -> Self {
        Self { scheme }
    }

    /// Create a resolver whose dispatcher comes from site properties.
    ///
    /// Falls back to [`DEFAULT_DISPATCHER`] when [`DISPATCHER_PROPERTY`] is
    /// unset or blank.
    #[must_use]
    pub fn from_properties(
        properties: &dyn SiteProperties,
        servlet: impl Into<String>,
        vanity_prefix: impl Into<String>,
    ) -> Self {
        Self::new(UrlScheme {
            servlet: servlet.into(),
            vanity_prefix: vanity_prefix.into(),
            dispatcher: properties.get_property(DISPATCHER_PROPERTY, DEFAULT_DISPATCHER),
        })
    }

    /// URL scheme in use.
    #[must_use]
    pub fn scheme(&self) -> &UrlScheme {
        &self.scheme
    }

    /// Resolve the URL of a content item.
    ///
    /// Returns `None` when `template` is blank. A blank `path` degrades to the
    /// default form.
    #[must_use]
    pub fn resolve(&self, page: &AssetId, template: &str, path: &str) -> Option<String> {
        let template = template.trim();
        if template.is_empty() {
            tracing::warn!(asset = %page, "Asset does not have a valid template set");
            return None;
        }

        let path = path.trim();
        if path.is_empty() {
            tracing::warn!(
                asset = %page,
                "Asset does not have a valid path set, defaulting to a non-vanity URL"
            );
            return Some(self.default_url(page, template));
        }

        Some(self.vanity_url(page, template, path))
    }

    fn default_url(&self, page: &AssetId, template: &str) -> String {
        format!(
            "{}?pagename={}&c={}&cid={}",
            self.scheme.servlet,
            encode_query(template),
            encode_query(&page.asset_type),
            page.id
        )
    }

    fn vanity_url(&self, page: &AssetId, template: &str, path: &str) -> String {
        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect();

        format!(
            "{}/{}?pagename={}&childpagename={}&c={}&cid={}",
            self.scheme.vanity_prefix.trim_end_matches('/'),
            segments.join("/"),
            encode_query(&self.scheme.dispatcher),
            encode_query(template),
            encode_query(&page.asset_type),
            page.id
        )
    }
}

fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use sitenav_store::MapProperties;

    use super::*;

    fn page() -> AssetId {
        AssetId::new("Page", 7)
    }

    #[test]
    fn test_blank_template_has_no_url() {
        let resolver = UrlResolver::default();

        assert!(resolver.resolve(&page(), "", "/a").is_none());
        assert!(resolver.resolve(&page(), "   ", "").is_none());
    }

    #[test]
    fn test_blank_path_uses_default_form() {
        let resolver = UrlResolver::default();

        assert_eq!(
            resolver.resolve(&page(), "Layout", " ").as_deref(),
            Some("/cs/ContentServer?pagename=Layout&c=Page&cid=7")
        );
    }

    #[test]
    fn test_path_uses_vanity_form() {
        let resolver = UrlResolver::default();

        assert_eq!(
            resolver.resolve(&page(), "Layout", "/a").as_deref(),
            Some("/a?pagename=GST/Dispatcher&childpagename=Layout&c=Page&cid=7")
        );
    }

    #[test]
    fn test_vanity_path_normalized() {
        let resolver = UrlResolver::new(UrlScheme {
            vanity_prefix: "/sites/first/".to_owned(),
            ..UrlScheme::default()
        });

        assert_eq!(
            resolver
                .resolve(&page(), "Layout", "products//big widgets/")
                .as_deref(),
            Some(
                "/sites/first/products/big%20widgets?pagename=GST/Dispatcher&childpagename=Layout&c=Page&cid=7"
            )
        );
    }

    #[test]
    fn test_query_values_encoded() {
        let resolver = UrlResolver::default();

        assert_eq!(
            resolver.resolve(&page(), "Site/Detail Layout", "").as_deref(),
            Some("/cs/ContentServer?pagename=Site/Detail%20Layout&c=Page&cid=7")
        );
    }

    #[test]
    fn test_dispatcher_from_properties() {
        let props = MapProperties::new().with(DISPATCHER_PROPERTY, "Site/Wrapper");
        let resolver = UrlResolver::from_properties(&props, DEFAULT_SERVLET, "");

        assert_eq!(resolver.scheme().dispatcher, "Site/Wrapper");
        assert_eq!(
            resolver.resolve(&page(), "Layout", "a").as_deref(),
            Some("/a?pagename=Site/Wrapper&childpagename=Layout&c=Page&cid=7")
        );
    }

    #[test]
    fn test_dispatcher_defaults_when_unset() {
        let resolver = UrlResolver::from_properties(&MapProperties::new(), DEFAULT_SERVLET, "");

        assert_eq!(resolver.scheme().dispatcher, DEFAULT_DISPATCHER);
    }

    #[test]
    fn test_dispatcher_defaults_when_blank() {
        let props = MapProperties::new().with(DISPATCHER_PROPERTY, "");
        let resolver = UrlResolver::from_properties(&props, DEFAULT_SERVLET, "");

        assert_eq!(resolver.scheme().dispatcher, DEFAULT_DISPATCHER);
    }

    #[test]
    fn test_url_never_empty() {
        let resolver = UrlResolver::new(UrlScheme {
            servlet: String::new(),
            vanity_prefix: String::new(),
            dispatcher: DEFAULT_DISPATCHER.to_owned(),
        });

        let url = resolver.resolve(&page(), "Layout", "").unwrap();
        assert!(!url.is_empty());
        let url = resolver.resolve(&page(), "Layout", "/").unwrap();
        assert!(url.starts_with("/?"));
    }
}
