//! Attribute and tensor index.
//!
//! [`AttributeIndex`] is the lookup surface the translators need from the
//! order engine's indexing layer: generic entities by id, the tensor behind a
//! product, dimensions by tensor position, and attribute names/offsets within
//! a dimension. [`CatalogIndex`] is the in-process implementation built from
//! the same catalog as the product table. It is strict about duplicate ids so
//! two generics can never share a key prefix.

use crate::catalog::identity::{PidAllocator, ProductId};
use crate::catalog::model::{CatalogNode, CatalogSpec, GroupSpec};
use crate::catalog::table::{Dimension, ProductTable};
use crate::error::CatalogError;
use serde::Serialize;
use std::collections::BTreeMap;

/// A sellable generic product, e.g. "latte".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericEntity {
    pub pid: ProductId,
    pub name: String,
    /// Tag of the family that lists this generic.
    pub family: String,
    pub tensor: Option<String>,
}

/// A named, ordered list of dimensions shared by the products that use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tensor {
    pub name: String,
    pub dimensions: Vec<String>,
}

pub trait AttributeIndex {
    /// Every generic, in id order.
    fn generics(&self) -> Box<dyn Iterator<Item = &GenericEntity> + '_>;

    /// Generic entity behind a key's product id.
    fn generic(&self, pid: ProductId) -> Option<&GenericEntity>;

    /// Id assigned to the generic called `name`.
    fn generic_id(&self, name: &str) -> Option<ProductId>;

    /// Tensor of the product; `None` when the product has no attributes.
    fn tensor(&self, pid: ProductId) -> Option<&Tensor>;

    /// Dimension at `position` of `tensor`, i.e. the one behind the
    /// position-th attribute field of a key.
    fn dimension(&self, tensor: &Tensor, position: usize) -> Option<&Dimension>;

    fn attribute_name<'d>(&self, dimension: &'d Dimension, offset: usize) -> Option<&'d str> {
        dimension.attributes.get(offset).map(String::as_str)
    }

    fn attribute_offset(&self, dimension: &Dimension, name: &str) -> Option<usize> {
        dimension.offset_of(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    generics: BTreeMap<ProductId, GenericEntity>,
    by_name: BTreeMap<String, ProductId>,
    tensors: BTreeMap<String, Tensor>,
    dimensions: BTreeMap<String, Dimension>,
}

impl CatalogIndex {
    /// Assign ids to every generic listed in `table`.
    ///
    /// Items that declare a `pid` in the catalog keep it; the rest are
    /// numbered from zero, skipping claimed ids. Allocation state lives only
    /// for the duration of this call, so rebuilding the index yields the same
    /// ids.
    pub fn build(catalog: &CatalogSpec, table: &ProductTable) -> Result<Self, CatalogError> {
        let explicit = explicit_pids(catalog)?;
        let mut allocator = PidAllocator::new(explicit.values().copied().collect());

        let mut generics = BTreeMap::new();
        let mut by_name = BTreeMap::new();
        for family in table.families() {
            for value in &family.values {
                let pid = match explicit.get(value.as_str()) {
                    Some(&pid) => ProductId(pid),
                    None => allocator.allocate(),
                };
                by_name.insert(value.clone(), pid);
                generics.insert(
                    pid,
                    GenericEntity {
                        pid,
                        name: value.clone(),
                        family: family.name.clone(),
                        tensor: family.tensor.clone(),
                    },
                );
            }
        }

        let tensors = catalog
            .tensors
            .iter()
            .map(|spec| {
                (
                    spec.name.clone(),
                    Tensor {
                        name: spec.name.clone(),
                        dimensions: spec.dimensions.clone(),
                    },
                )
            })
            .collect();

        let dimensions = table
            .dimensions()
            .iter()
            .map(|dimension| (dimension.name.clone(), dimension.clone()))
            .collect();

        Ok(Self {
            generics,
            by_name,
            tensors,
            dimensions,
        })
    }

    /// Number of generics with an assigned id.
    pub fn len(&self) -> usize {
        self.generics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generics.is_empty()
    }
}

impl AttributeIndex for CatalogIndex {
    fn generics(&self) -> Box<dyn Iterator<Item = &GenericEntity> + '_> {
        Box::new(self.generics.values())
    }

    fn generic(&self, pid: ProductId) -> Option<&GenericEntity> {
        self.generics.get(&pid)
    }

    fn generic_id(&self, name: &str) -> Option<ProductId> {
        self.by_name.get(name).copied()
    }

    fn tensor(&self, pid: ProductId) -> Option<&Tensor> {
        let name = self.generics.get(&pid)?.tensor.as_deref()?;
        self.tensors.get(name)
    }

    fn dimension(&self, tensor: &Tensor, position: usize) -> Option<&Dimension> {
        let name = tensor.dimensions.get(position)?;
        self.dimensions.get(name)
    }
}

fn explicit_pids(catalog: &CatalogSpec) -> Result<BTreeMap<&str, u32>, CatalogError> {
    let mut by_name = BTreeMap::new();
    let mut claimed: BTreeMap<u32, &str> = BTreeMap::new();
    let mut pending: Vec<&GroupSpec> = catalog.catalog.iter().collect();

    while let Some(group) = pending.pop() {
        for node in &group.items {
            match node {
                CatalogNode::Group(nested) => pending.push(nested),
                CatalogNode::Item(item) => {
                    let Some(pid) = item.pid else { continue };
                    if let Some(other) = claimed.insert(pid, item.name.as_str()) {
                        if other != item.name {
                            return Err(CatalogError::DuplicateProduct {
                                name: item.name.clone(),
                                detail: format!("pid {pid} is already assigned to \"{other}\""),
                            });
                        }
                    }
                    by_name.insert(item.name.as_str(), pid);
                }
            }
        }
    }

    Ok(by_name)
}
