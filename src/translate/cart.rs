//! Cart documents on both sides of the translation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat-schema cart exchanged with the text-driven ordering side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCart {
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: FlatProduct,
    pub quantity: u32,
}

/// A top-level product record. Attribute fields sit alongside `type` and
/// `name` in the document and are collected into `attributes` by property
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatProduct {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub options: Vec<FlatOption>,
}

/// An option record. Options never carry options of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatOption {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

/// Internal cart consumed by the order-management engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalCart {
    pub items: Vec<ItemInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Colon-separated composite key, see [`crate::translate::CompositeKey`].
    pub key: String,
    pub quantity: u32,
    pub uid: u64,
    #[serde(default)]
    pub children: Vec<ItemInstance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_product_keeps_attributes_beside_name() {
        let value = json!({
            "type": "LatteDrinks",
            "name": "latte",
            "temperature": "iced",
            "options": [{"type": "Syrups", "name": "vanilla syrup", "amount": "extra"}]
        });
        let product: FlatProduct = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(product.attributes.get("temperature").map(String::as_str), Some("iced"));
        assert_eq!(product.options[0].attributes.get("amount").map(String::as_str), Some("extra"));
        assert_eq!(serde_json::to_value(&product).unwrap(), value);
    }

    #[test]
    fn missing_options_default_to_empty() {
        let product: FlatProduct =
            serde_json::from_value(json!({"type": "BakeryProducts", "name": "blueberry muffin"}))
                .unwrap();
        assert!(product.options.is_empty());
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn internal_children_default_to_empty() {
        let item: ItemInstance =
            serde_json::from_value(json!({"key": "3:1", "quantity": 1, "uid": 9})).unwrap();
        assert!(item.children.is_empty());
    }
}
