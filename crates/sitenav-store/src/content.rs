//! Content item attribute access.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::asset::AssetId;
use crate::store::StoreError;

/// Date formats used by the content repository for date attributes.
const JDBC_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a date in JDBC timestamp form (`yyyy-MM-dd HH:mm:ss[.SSS]`).
///
/// Returns `None` for blank or malformed input.
#[must_use]
pub fn parse_jdbc_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    JDBC_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Single attribute value of a content item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    /// String-valued attribute.
    Text(String),
    /// Date-valued attribute.
    Date(NaiveDateTime),
}

/// Attributes read for one content item.
///
/// Only attributes that are present on the item appear in the set; a missing
/// attribute and an attribute that was not requested both read as `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSet {
    id: AssetId,
    subtype: Option<String>,
    values: HashMap<String, AttributeValue>,
}

impl AttributeSet {
    /// Create an empty attribute set for a content item.
    #[must_use]
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            subtype: None,
            values: HashMap::new(),
        }
    }

    /// Set the resolved subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Add a text attribute.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, AttributeValue::Text(value.into()));
        self
    }

    /// Insert or replace an attribute value.
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.values.insert(name.into(), value);
    }

    /// Content item these attributes belong to.
    #[must_use]
    pub fn asset_id(&self) -> &AssetId {
        &self.id
    }

    /// Resolved subtype, if the item has one.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Raw attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Text value of an attribute.
    ///
    /// Returns `None` when the attribute is absent or date-valued.
    #[must_use]
    pub fn as_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            AttributeValue::Text(value) => Some(value),
            AttributeValue::Date(_) => None,
        }
    }

    /// Date value of an attribute.
    ///
    /// Text values are parsed from JDBC timestamp form; unparseable text reads
    /// as `None`.
    #[must_use]
    pub fn as_date(&self, name: &str) -> Option<NaiveDateTime> {
        match self.values.get(name)? {
            AttributeValue::Date(value) => Some(*value),
            AttributeValue::Text(value) => parse_jdbc_date(value),
        }
    }

    /// Number of attributes present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no attributes are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads named attributes of content items.
pub trait ContentReader: Send + Sync {
    /// Read the given attributes of a content item.
    ///
    /// Attributes the item does not carry are left out of the result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with kind `NotFound` when the item does not exist,
    /// `TypeMismatch` when it exists under a different type, or any other kind
    /// when the read mechanism itself fails.
    fn read_attributes(&self, id: &AssetId, names: &[&str]) -> Result<AttributeSet, StoreError>;
}
