//! Normalized product table produced by the catalog compiler.

use crate::casing::{to_property_name, to_type_name};
use crate::error::CatalogError;
use serde::Serialize;
use std::collections::BTreeMap;

/// One generic product family: a leaf group of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFamily {
    /// The group's single tag. Unique across the table.
    pub name: String,
    /// Legal generic names (the group's item names).
    pub values: Vec<String>,
    pub tensor: Option<String>,
    /// Dimension names in key order.
    pub dimensions: Vec<String>,
    pub exclusives: Vec<String>,
    pub options: Vec<String>,
    /// Own tag followed by every tag inherited from enclosing option groups.
    pub tags: Vec<String>,
    pub is_option: bool,
}

impl ProductFamily {
    /// Discriminant used for this family in the flat schema.
    pub fn type_name(&self) -> String {
        to_type_name(&self.name)
    }

    /// Flat-schema property names, one per dimension, in key order.
    pub fn property_names(&self) -> Vec<String> {
        self.dimensions
            .iter()
            .map(|dimension| to_property_name(dimension))
            .collect()
    }

    /// Whether `value` is one of this family's generic names.
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|candidate| candidate == value)
    }

    pub(crate) fn add_exclusive(&mut self, family: &str) {
        if !self.exclusives.iter().any(|name| name == family) {
            self.exclusives.push(family.to_string());
        }
    }

    /// Exclusions win: a family already listed as exclusive is never added as
    /// an option.
    pub(crate) fn add_option(&mut self, family: &str) -> bool {
        if self.exclusives.iter().any(|name| name == family)
            || self.options.iter().any(|name| name == family)
        {
            return false;
        }
        self.options.push(family.to_string());
        true
    }
}

/// A catalog dimension with its attribute names in offset order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    pub attributes: Vec<String>,
}

impl Dimension {
    /// Name of the string-literal union this dimension renders to.
    pub fn type_name(&self) -> String {
        to_type_name(&self.name)
    }

    pub fn offset_of(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|name| name == attribute)
    }
}

/// Families in catalog order plus the catalog's dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductTable {
    families: Vec<ProductFamily>,
    #[serde(skip)]
    by_name: BTreeMap<String, usize>,
    dimensions: Vec<Dimension>,
}

impl ProductTable {
    pub(crate) fn new(dimensions: Vec<Dimension>) -> Self {
        Self {
            families: Vec::new(),
            by_name: BTreeMap::new(),
            dimensions,
        }
    }

    pub(crate) fn insert(&mut self, family: ProductFamily) -> Result<(), CatalogError> {
        if self.by_name.contains_key(&family.name) {
            return Err(CatalogError::DuplicateProduct {
                name: family.name.clone(),
                detail: "tag names more than one product group".to_string(),
            });
        }
        self.by_name.insert(family.name.clone(), self.families.len());
        self.families.push(family);
        Ok(())
    }

    /// Every family, in catalog order.
    pub fn families(&self) -> &[ProductFamily] {
        &self.families
    }

    /// Family whose tag is `name`.
    pub fn family(&self, name: &str) -> Option<&ProductFamily> {
        self.by_name.get(name).map(|&idx| &self.families[idx])
    }

    pub(crate) fn family_at(&self, idx: usize) -> &ProductFamily {
        &self.families[idx]
    }

    pub(crate) fn family_at_mut(&mut self, idx: usize) -> &mut ProductFamily {
        &mut self.families[idx]
    }

    /// Families that may appear as line items.
    pub fn top_level(&self) -> impl Iterator<Item = &ProductFamily> {
        self.families.iter().filter(|family| !family.is_option)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension called `name`, if the catalog declares one.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.name == name)
    }

    /// Number of families, option families included.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
