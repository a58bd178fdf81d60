//! Parsed catalog definition.
//!
//! These types mirror the catalog file one-to-one and carry no derived state.
//! The compiler in [`crate::catalog::compiler`] is the only consumer that
//! interprets group kinds, tags and rules.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tensor reference meaning "this group has no attribute dimensions".
pub const NO_TENSOR: &str = "none";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSpec {
    #[serde(default)]
    pub dimensions: Vec<DimensionSpec>,
    #[serde(default)]
    pub tensors: Vec<TensorSpec>,
    #[serde(default)]
    pub catalog: Vec<GroupSpec>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub name: String,
    pub attributes: Vec<AttributeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
    pub name: String,
    pub dimensions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    #[default]
    Group,
    /// Descendants are add-ons to other products rather than products.
    Option,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: GroupKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tensor: Option<String>,
    pub items: Vec<CatalogNode>,
}

impl GroupSpec {
    /// Human-readable label for diagnostics.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.tags.as_deref() {
            Some([first, ..]) => first.clone(),
            _ => "<unnamed group>".to_string(),
        }
    }

    /// Tensor name, treating `none` as absent.
    pub fn tensor_ref(&self) -> Option<&str> {
        self.tensor
            .as_deref()
            .filter(|tensor| !tensor.is_empty() && *tensor != NO_TENSOR)
    }
}

/// Entry under a group's `items`: either a nested group or a concrete item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogNode {
    Group(GroupSpec),
    Item(ItemSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Composition rule. Exclusion rules are listed first so untagged matching
/// tries the `exclusive` shape before the `children` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Exclusive {
        parents: Vec<String>,
        exclusive: Vec<String>,
    },
    Children {
        parents: Vec<String>,
        children: Vec<String>,
    },
}

/// Parse a catalog definition from YAML (or JSON, which YAML accepts).
pub fn load_catalog_from_path(path: &Path) -> Result<CatalogSpec> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    parse_catalog(&data).with_context(|| format!("parsing catalog {}", path.display()))
}

pub fn parse_catalog(source: &str) -> Result<CatalogSpec> {
    let catalog: CatalogSpec = serde_yaml::from_str(source)?;
    Ok(catalog)
}
