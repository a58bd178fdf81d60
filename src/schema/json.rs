//! JSON Schema rendering of the flat cart contract.
//!
//! Mirrors the TypeScript declarations so flat cart documents can be checked
//! mechanically before translation. Family and dimension definitions are
//! keyed by their rendered type names.

use crate::casing::{to_property_name, to_type_name};
use crate::catalog::{ProductFamily, ProductTable};
use serde_json::{Map, Value, json};

pub const DRAFT: &str = "http://json-schema.org/draft-07/schema#";

pub fn render_json_schema(table: &ProductTable) -> Value {
    let mut definitions = Map::new();

    definitions.insert(
        "LineItem".to_string(),
        json!({
            "type": "object",
            "required": ["product", "quantity"],
            "properties": {
                "product": {"$ref": "#/definitions/Product"},
                "quantity": {"type": "integer", "minimum": 0},
            },
            "additionalProperties": false,
        }),
    );

    let top_level: Vec<&str> = table.top_level().map(|f| f.name.as_str()).collect();
    definitions.insert("Product".to_string(), one_of(&top_level));

    for family in table.families() {
        definitions.insert(family.type_name(), family_schema(family));
    }
    for dimension in table.dimensions() {
        definitions.insert(
            dimension.type_name(),
            json!({"type": "string", "enum": dimension.attributes}),
        );
    }

    json!({
        "$schema": DRAFT,
        "title": "Cart",
        "type": "object",
        "required": ["items"],
        "properties": {
            "items": {
                "type": "array",
                "items": {"$ref": "#/definitions/LineItem"},
            },
        },
        "additionalProperties": false,
        "definitions": definitions,
    })
}

fn family_schema(family: &ProductFamily) -> Value {
    let mut properties = Map::new();
    properties.insert("type".to_string(), json!({"const": family.type_name()}));
    properties.insert("name".to_string(), json!({"enum": family.values}));
    for dimension in &family.dimensions {
        properties.insert(
            to_property_name(dimension),
            reference(&to_type_name(dimension)),
        );
    }

    // Only top-level families carry `options`; an empty list is still
    // accepted so decoded carts validate unchanged.
    if !family.is_option || !family.options.is_empty() {
        let options = if family.options.is_empty() {
            json!({"type": "array", "maxItems": 0})
        } else {
            let names: Vec<&str> = family.options.iter().map(String::as_str).collect();
            json!({"type": "array", "items": one_of(&names)})
        };
        properties.insert("options".to_string(), options);
    }

    json!({
        "type": "object",
        "required": ["type", "name"],
        "properties": properties,
        "additionalProperties": false,
    })
}

fn one_of(tags: &[&str]) -> Value {
    if tags.is_empty() {
        return json!({"not": {}});
    }
    let refs: Vec<Value> = tags.iter().map(|tag| reference(&to_type_name(tag))).collect();
    json!({"oneOf": refs})
}

fn reference(type_name: &str) -> Value {
    json!({"$ref": format!("#/definitions/{type_name}")})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{compile, parse_catalog};

    const CATALOG: &str = r#"
dimensions:
  - name: temperature
    attributes: [{name: hot}, {name: iced}]
tensors:
  - name: coffee
    dimensions: [temperature]
catalog:
  - tags: [latte_drinks]
    tensor: coffee
    items: [{name: latte}]
  - type: option
    items:
      - tags: [syrups]
        items: [{name: vanilla syrup}]
rules:
  - parents: [latte_drinks]
    children: [syrups]
"#;

    #[test]
    fn definitions_cover_families_and_dimensions() {
        let table = compile(&parse_catalog(CATALOG).unwrap()).unwrap();
        let schema = render_json_schema(&table);

        assert_eq!(
            schema.pointer("/definitions/Product/oneOf/0/$ref"),
            Some(&json!("#/definitions/LatteDrinks"))
        );
        assert_eq!(
            schema.pointer("/definitions/LatteDrinks/properties/temperature/$ref"),
            Some(&json!("#/definitions/Temperature"))
        );
        assert_eq!(
            schema.pointer("/definitions/LatteDrinks/properties/options/items/oneOf/0/$ref"),
            Some(&json!("#/definitions/Syrups"))
        );
        assert_eq!(
            schema.pointer("/definitions/Temperature/enum"),
            Some(&json!(["hot", "iced"]))
        );
        assert!(schema.pointer("/definitions/Syrups/properties/options").is_none());
    }
}
