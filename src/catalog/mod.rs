//! Catalog compilation.
//!
//! A parsed [`CatalogSpec`] is compiled once into a [`Menu`]: the product
//! table, the tag index over it, the generic-name resolver, and the attribute
//! index that assigns generic ids. Everything in a `Menu` is read-only after
//! construction, so one instance can back any number of concurrent
//! translations.

pub mod compiler;
pub mod identity;
pub mod index;
pub mod model;
pub mod resolver;
pub mod table;
pub mod tags;

pub use compiler::compile;
pub use identity::{IdGenerator, ProductId, SequentialIds};
pub use index::{AttributeIndex, CatalogIndex, GenericEntity, Tensor};
pub use model::{
    AttributeSpec, CatalogNode, CatalogSpec, DimensionSpec, GroupKind, GroupSpec, ItemSpec,
    RuleSpec, TensorSpec, load_catalog_from_path, parse_catalog,
};
pub use resolver::NameResolver;
pub use table::{Dimension, ProductFamily, ProductTable};
pub use tags::TagIndex;

use crate::error::CatalogError;

/// Default relative path to the bundled catalog.
pub const DEFAULT_CATALOG_PATH: &str = "catalogs/coffee_menu.yaml";

#[derive(Debug, Clone)]
pub struct Menu {
    table: ProductTable,
    tags: TagIndex,
    resolver: NameResolver,
    index: CatalogIndex,
}

impl Menu {
    /// Compile `catalog`. Any error here means the catalog cannot serve carts.
    pub fn build(catalog: &CatalogSpec) -> Result<Self, CatalogError> {
        let (table, tags) = compiler::compile_indexed(catalog)?;
        let resolver = NameResolver::build(&table)?;
        let index = CatalogIndex::build(catalog, &table)?;
        Ok(Self {
            table,
            tags,
            resolver,
            index,
        })
    }

    /// Compiled families and dimensions.
    pub fn table(&self) -> &ProductTable {
        &self.table
    }

    /// The tag index the composition rules were resolved against.
    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }
}
