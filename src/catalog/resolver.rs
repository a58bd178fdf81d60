//! Generic-name to family lookups shared by both translators.

use crate::catalog::table::{ProductFamily, ProductTable};
use crate::error::CatalogError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameResolver {
    generic_to_type: BTreeMap<String, String>,
    type_to_family: BTreeMap<String, String>,
}

/// Declarations every rendered schema carries regardless of the catalog.
const FIXED_TYPE_NAMES: [&str; 3] = ["Cart", "LineItem", "Product"];

impl NameResolver {
    /// Fails if two declarations render to the same type name, or if a
    /// generic name appears in more than one family. Families, dimensions and
    /// the fixed cart declarations all share one namespace.
    pub fn build(table: &ProductTable) -> Result<Self, CatalogError> {
        let mut declared: BTreeMap<String, String> = FIXED_TYPE_NAMES
            .iter()
            .map(|name| (name.to_string(), "the cart schema".to_string()))
            .collect();
        let mut declare = |type_name: String, owner: String| match declared.get(&type_name) {
            Some(existing) => Err(CatalogError::DuplicateProduct {
                detail: format!("{existing} and {owner} render to the same type name"),
                name: type_name,
            }),
            None => {
                declared.insert(type_name, owner);
                Ok(())
            }
        };

        let mut generic_to_type = BTreeMap::new();
        let mut type_to_family = BTreeMap::new();
        for family in table.families() {
            let type_name = family.type_name();
            declare(type_name.clone(), format!("tag \"{}\"", family.name))?;
            type_to_family.insert(type_name.clone(), family.name.clone());

            for value in &family.values {
                if let Some(previous) = generic_to_type.insert(value.clone(), type_name.clone()) {
                    return Err(CatalogError::DuplicateProduct {
                        name: value.clone(),
                        detail: format!("listed under both {previous} and {type_name}"),
                    });
                }
            }
        }
        for dimension in table.dimensions() {
            declare(dimension.type_name(), format!("dimension \"{}\"", dimension.name))?;
        }

        Ok(Self {
            generic_to_type,
            type_to_family,
        })
    }

    /// Type name of the family that lists `generic`.
    pub fn family_type(&self, generic: &str) -> Option<&str> {
        self.generic_to_type.get(generic).map(String::as_str)
    }

    /// Family tag behind a rendered type name.
    pub fn family_tag(&self, type_name: &str) -> Option<&str> {
        self.type_to_family.get(type_name).map(String::as_str)
    }

    /// Family that lists `generic`, looked up through its type name.
    pub fn family_of<'t>(
        &self,
        table: &'t ProductTable,
        generic: &str,
    ) -> Option<&'t ProductFamily> {
        let type_name = self.family_type(generic)?;
        let tag = self.family_tag(type_name)?;
        table.family(tag)
    }
}
