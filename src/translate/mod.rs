//! Cart translation between the flat schema and composite keys.
//!
//! A [`Translator`] borrows the compiled catalog and never mutates it, so one
//! translator can serve many carts (and many threads). Decoding and encoding
//! are single-pass walks over a two-level tree: line items, then their
//! options.

pub mod cart;
pub mod decode;
pub mod encode;
pub mod key;
pub mod report;

pub use cart::{FlatCart, FlatOption, FlatProduct, InternalCart, ItemInstance, LineItem};
pub use key::CompositeKey;
pub use report::{BatchReport, CartOutcome, CartReport, ItemFailure, run_batch};

use crate::catalog::{
    AttributeIndex, Dimension, IdGenerator, Menu, NameResolver, ProductFamily, ProductId,
    ProductTable,
};
use crate::error::TranslationError;

pub struct Translator<'a> {
    table: &'a ProductTable,
    resolver: &'a NameResolver,
    index: &'a (dyn AttributeIndex + Sync),
    ids: &'a dyn IdGenerator,
}

impl<'a> Translator<'a> {
    /// Translator over a compiled menu. Cheap: nothing is copied, so a fresh
    /// one per session or per id generator costs only the borrows.
    pub fn new(menu: &'a Menu, ids: &'a dyn IdGenerator) -> Self {
        Self::with_index(menu.table(), menu.resolver(), menu.index(), ids)
    }

    /// Build a translator over an externally supplied attribute index.
    pub fn with_index(
        table: &'a ProductTable,
        resolver: &'a NameResolver,
        index: &'a (dyn AttributeIndex + Sync),
        ids: &'a dyn IdGenerator,
    ) -> Self {
        Self {
            table,
            resolver,
            index,
            ids,
        }
    }

    fn family_for(&self, generic: &str) -> Result<&'a ProductFamily, TranslationError> {
        self.resolver
            .family_of(self.table, generic)
            .ok_or_else(|| TranslationError::UnresolvedFamily {
                name: generic.to_string(),
            })
    }

    /// Dimensions of `pid`'s tensor in key order, checked against the
    /// family's own dimension list.
    fn dimensions_for(
        &self,
        pid: ProductId,
        family: &ProductFamily,
    ) -> Result<Vec<&'a Dimension>, TranslationError> {
        let Some(tensor) = self.index.tensor(pid) else {
            if family.dimensions.is_empty() {
                return Ok(Vec::new());
            }
            return Err(TranslationError::Internal {
                detail: format!("{} has dimensions but product {pid} has no tensor", family.name),
            });
        };

        let mut dimensions = Vec::with_capacity(tensor.dimensions.len());
        for position in 0..tensor.dimensions.len() {
            let dimension = self.index.dimension(tensor, position).ok_or_else(|| {
                TranslationError::Internal {
                    detail: format!(
                        "tensor \"{}\" has no dimension at position {position}",
                        tensor.name
                    ),
                }
            })?;
            dimensions.push(dimension);
        }

        let names: Vec<&str> = dimensions.iter().map(|d| d.name.as_str()).collect();
        if names != family.dimensions {
            return Err(TranslationError::Internal {
                detail: format!(
                    "tensor \"{}\" dimensions {names:?} disagree with {} dimensions {:?}",
                    tensor.name, family.name, family.dimensions
                ),
            });
        }
        Ok(dimensions)
    }
}
