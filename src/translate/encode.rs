//! Flat cart -> internal cart.

use super::Translator;
use super::cart::{FlatCart, FlatOption, InternalCart, ItemInstance, LineItem};
use super::key::CompositeKey;
use super::report::{self, CartReport};
use crate::catalog::ProductFamily;
use crate::error::TranslationError;
use std::collections::BTreeMap;

impl<'a> Translator<'a> {
    /// Encode every line item; the first failure fails the whole cart.
    pub fn encode(&self, cart: &FlatCart) -> Result<InternalCart, TranslationError> {
        let items = cart
            .items
            .iter()
            .map(|item| self.encode_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InternalCart { items })
    }

    pub fn encode_lenient(&self, cart: &FlatCart) -> CartReport<ItemInstance> {
        report::collect(&cart.items, |item| self.encode_item(item))
    }

    /// Encode one line item and its options.
    ///
    /// Every key is built before any uid is drawn, so a rejected item never
    /// consumes ids.
    pub fn encode_item(&self, item: &LineItem) -> Result<ItemInstance, TranslationError> {
        let product = &item.product;
        let (family, key) =
            self.encode_record(&product.type_name, &product.name, &product.attributes)?;
        if family.is_option {
            return Err(TranslationError::NotTopLevel {
                family: family.name.clone(),
            });
        }

        let mut child_keys = Vec::with_capacity(product.options.len());
        for option in &product.options {
            child_keys.push(self.encode_option(family, option)?);
        }

        let uid = self.ids.next();
        let children = child_keys
            .into_iter()
            .map(|key| ItemInstance {
                key: key.to_string(),
                quantity: 1,
                uid: self.ids.next(),
                children: Vec::new(),
            })
            .collect();

        Ok(ItemInstance {
            key: key.to_string(),
            quantity: item.quantity,
            uid,
            children,
        })
    }

    fn encode_option(
        &self,
        parent: &ProductFamily,
        option: &FlatOption,
    ) -> Result<CompositeKey, TranslationError> {
        let (family, key) =
            self.encode_record(&option.type_name, &option.name, &option.attributes)?;
        if !parent.options.iter().any(|name| *name == family.name) {
            return Err(TranslationError::OptionNotAllowed {
                parent: parent.name.clone(),
                option: family.name.clone(),
            });
        }
        Ok(key)
    }

    fn encode_record(
        &self,
        declared: &str,
        name: &str,
        attributes: &BTreeMap<String, String>,
    ) -> Result<(&'a ProductFamily, CompositeKey), TranslationError> {
        let pid = self
            .index
            .generic_id(name)
            .ok_or_else(|| TranslationError::UnknownGenericName {
                name: name.to_string(),
            })?;
        let family = self.family_for(name)?;

        let expected = family.type_name();
        if declared != expected {
            return Err(TranslationError::TypeMismatch {
                name: name.to_string(),
                declared: declared.to_string(),
                expected,
            });
        }

        let dimensions = self.dimensions_for(pid, family)?;
        let properties = family.property_names();

        let mut offsets = Vec::with_capacity(dimensions.len());
        for (dimension, property) in dimensions.iter().zip(&properties) {
            let Some(value) = attributes.get(property) else {
                return Err(TranslationError::MissingAttributeValue {
                    family: family.name.clone(),
                    property: property.clone(),
                });
            };
            let offset = self.index.attribute_offset(dimension, value).ok_or_else(|| {
                TranslationError::UnknownAttributeValue {
                    family: family.name.clone(),
                    property: property.clone(),
                    dimension: dimension.name.clone(),
                    value: value.clone(),
                }
            })?;
            offsets.push(offset);
        }

        if let Some(extra) = attributes.keys().find(|key| !properties.contains(*key)) {
            return Err(TranslationError::UnexpectedAttribute {
                family: family.name.clone(),
                property: extra.clone(),
            });
        }

        Ok((family, CompositeKey::new(pid, offsets)))
    }
}
