//! Internal cart -> flat cart.

use super::Translator;
use super::cart::{FlatCart, FlatOption, FlatProduct, InternalCart, ItemInstance, LineItem};
use super::key::CompositeKey;
use super::report::{self, CartReport};
use crate::catalog::ProductFamily;
use crate::error::TranslationError;
use std::collections::BTreeMap;
use tracing::debug;

struct Record<'a> {
    family: &'a ProductFamily,
    name: String,
    attributes: BTreeMap<String, String>,
}

impl<'a> Translator<'a> {
    /// Decode every item; the first failure fails the whole cart.
    pub fn decode(&self, cart: &InternalCart) -> Result<FlatCart, TranslationError> {
        let items = cart
            .items
            .iter()
            .map(|item| self.decode_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FlatCart { items })
    }

    /// Decode every item that can be decoded, reporting the rest.
    pub fn decode_lenient(&self, cart: &InternalCart) -> CartReport<LineItem> {
        report::collect(&cart.items, |item| self.decode_item(item))
    }

    pub fn decode_item(&self, item: &ItemInstance) -> Result<LineItem, TranslationError> {
        let record = self.decode_record(item)?;
        if record.family.is_option {
            return Err(TranslationError::NotTopLevel {
                family: record.family.name.clone(),
            });
        }

        let mut options = Vec::with_capacity(item.children.len());
        for child in &item.children {
            options.push(self.decode_option(child)?);
        }

        Ok(LineItem {
            product: FlatProduct {
                type_name: record.family.type_name(),
                name: record.name,
                attributes: record.attributes,
                options,
            },
            quantity: item.quantity,
        })
    }

    fn decode_option(&self, child: &ItemInstance) -> Result<FlatOption, TranslationError> {
        if !child.children.is_empty() {
            debug!(key = %child.key, "ignoring nested children of an option");
        }
        let record = self.decode_record(child)?;
        Ok(FlatOption {
            type_name: record.family.type_name(),
            name: record.name,
            attributes: record.attributes,
        })
    }

    fn decode_record(&self, item: &ItemInstance) -> Result<Record<'a>, TranslationError> {
        let key = CompositeKey::parse(&item.key)?;
        let generic =
            self.index
                .generic(key.pid)
                .ok_or_else(|| TranslationError::UnknownProductId {
                    key: item.key.clone(),
                    pid: key.pid,
                })?;
        let family = self.family_for(&generic.name)?;
        let dimensions = self.dimensions_for(key.pid, family)?;

        if key.offsets.len() != dimensions.len() {
            return Err(TranslationError::KeyArity {
                family: family.name.clone(),
                key: item.key.clone(),
                expected: dimensions.len(),
                found: key.offsets.len(),
            });
        }

        let mut attributes = BTreeMap::new();
        for ((dimension, property), &offset) in dimensions
            .iter()
            .zip(family.property_names())
            .zip(&key.offsets)
        {
            let Some(value) = self.index.attribute_name(dimension, offset) else {
                return Err(TranslationError::AttributeIndexOutOfRange {
                    family: family.name.clone(),
                    property,
                    dimension: dimension.name.clone(),
                    offset,
                    len: dimension.attributes.len(),
                });
            };
            attributes.insert(property, value.to_string());
        }

        Ok(Record {
            family,
            name: generic.name.clone(),
            attributes,
        })
    }
}
