//! YAML site plan document.
//!
//! Raw serde structures for the plan file and their conversion into the
//! indexed form used by [`SitePlanStore`](crate::SitePlanStore).

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use sitenav_store::{
    AssetId, AttributeSet, AttributeValue, HierarchyRow, NodeStatus, parse_jdbc_date,
};

use crate::PlanError;

/// Plan file as parsed from YAML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlanFile {
    pub properties: HashMap<String, String>,
    pub sites: Vec<SiteEntry>,
    pub nodes: Vec<NodeEntry>,
    pub assets: Vec<AssetEntry>,
}

/// Site and its top-level container node.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SiteEntry {
    pub name: String,
    pub node: i64,
}

/// One site plan table row.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NodeEntry {
    pub id: i64,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(rename = "type")]
    pub object_type: String,
    pub oid: i64,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub status: NodeStatus,
}

/// Content item with its attributes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AssetEntry {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub id: i64,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_yaml::Value>,
}

/// Placed or unplaced row with its status.
#[derive(Debug)]
pub(crate) struct PlanNode {
    pub row: HierarchyRow,
    pub status: NodeStatus,
}

/// Content item ready to serve attribute reads.
#[derive(Debug)]
pub(crate) struct PlanAsset {
    pub attributes: AttributeSet,
    pub sites: HashSet<String>,
}

/// Parse a plan document.
pub(crate) fn parse(content: &str) -> Result<PlanFile, PlanError> {
    if content.trim().is_empty() {
        return Ok(PlanFile::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

impl NodeEntry {
    pub(crate) fn into_node(self) -> PlanNode {
        PlanNode {
            row: HierarchyRow {
                node_id: self.id,
                parent_id: self.parent,
                object_type: self.object_type,
                object_id: self.oid,
                rank: self.rank,
            },
            status: self.status,
        }
    }
}

impl AssetEntry {
    pub(crate) fn into_asset(self) -> Result<PlanAsset, PlanError> {
        let id = AssetId::new(self.asset_type, self.id);
        let mut attributes = AttributeSet::new(id.clone());
        if let Some(subtype) = self.subtype {
            attributes = attributes.with_subtype(subtype);
        }
        for (name, value) in self.attributes {
            if let Some(text) = scalar_text(&value) {
                attributes.insert(name, attribute_value(text));
            } else if !value.is_null() {
                return Err(PlanError::Invalid(format!(
                    "attribute '{name}' of asset {id} must be a scalar"
                )));
            }
        }
        Ok(PlanAsset {
            attributes,
            sites: self.sites.into_iter().collect(),
        })
    }
}

/// Typed attribute value; timestamps load as dates.
fn attribute_value(text: String) -> AttributeValue {
    match parse_jdbc_date(&text) {
        Some(date) => AttributeValue::Date(date),
        None => AttributeValue::Text(text),
    }
}

/// Text form of a scalar YAML value.
fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
