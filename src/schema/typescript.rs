//! TypeScript declarations for the flat cart schema.
//!
//! The output is plain text: a `Cart`/`LineItem` header, the `Product` union
//! of top-level families, one interface per family and one string-literal
//! union per dimension. Layout is fixed (two-space indent, one member per
//! line) so regenerating from an unchanged catalog is byte-stable.

use crate::casing::{to_property_name, to_type_name};
use crate::catalog::{Dimension, ProductFamily, ProductTable};

const HEADER: &str = "// Generated from the product catalog. Do not edit by hand.";

pub fn render_typescript(table: &ProductTable) -> String {
    let mut blocks: Vec<String> = vec![HEADER.to_string(), format_cart()];

    let top_level: Vec<&str> = table.top_level().map(|f| f.name.as_str()).collect();
    blocks.push(format!("export type Product = {};", type_union(&top_level)));

    for family in table.families() {
        blocks.push(format_family(family));
    }
    for dimension in table.dimensions() {
        blocks.push(format_dimension(dimension));
    }

    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

fn format_cart() -> String {
    [
        "export interface Cart {",
        "  items: LineItem[];",
        "}",
        "",
        "export interface LineItem {",
        "  product: Product;",
        "  quantity: number;",
        "}",
    ]
    .join("\n")
}

fn format_family(family: &ProductFamily) -> String {
    let type_name = family.type_name();
    let mut lines = vec![
        format!("export interface {type_name} {{"),
        format!("  type: {};", string_literal(&type_name)),
        format!("  name: {};", literal_union(&family.values)),
    ];
    for dimension in &family.dimensions {
        lines.push(format!(
            "  {}?: {};",
            to_property_name(dimension),
            to_type_name(dimension)
        ));
    }
    if !family.options.is_empty() {
        let options: Vec<&str> = family.options.iter().map(String::as_str).collect();
        lines.push(format!("  options: ({})[];", type_union(&options)));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn format_dimension(dimension: &Dimension) -> String {
    format!(
        "export type {} = {};",
        dimension.type_name(),
        literal_union(&dimension.attributes)
    )
}

fn type_union(tags: &[&str]) -> String {
    if tags.is_empty() {
        return "never".to_string();
    }
    tags.iter()
        .map(|tag| to_type_name(tag))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn literal_union(values: &[String]) -> String {
    if values.is_empty() {
        return "never".to_string();
    }
    values
        .iter()
        .map(|value| string_literal(value))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{compile, parse_catalog};

    const CATALOG: &str = r#"
dimensions:
  - name: coffee_temperature
    attributes: [{name: hot}, {name: iced}]
tensors:
  - name: coffee
    dimensions: [coffee_temperature]
catalog:
  - tags: [latte_drinks]
    tensor: coffee
    items: [{name: latte}, {name: "baker's latte"}]
  - type: option
    items:
      - tags: [syrups]
        items: [{name: vanilla syrup}]
rules:
  - parents: [latte_drinks]
    children: [syrups]
"#;

    fn rendered() -> String {
        render_typescript(&compile(&parse_catalog(CATALOG).unwrap()).unwrap())
    }

    #[test]
    fn renders_family_interface() {
        let text = rendered();
        let expected = [
            "export interface LatteDrinks {",
            "  type: 'LatteDrinks';",
            "  name: 'latte' | 'baker\\'s latte';",
            "  coffeeTemperature?: CoffeeTemperature;",
            "  options: (Syrups)[];",
            "}",
        ]
        .join("\n");
        assert!(text.contains(&expected), "missing LatteDrinks block:\n{text}");
    }

    #[test]
    fn option_families_are_declared_but_not_in_product_union() {
        let text = rendered();
        assert!(text.contains("export type Product = LatteDrinks;"));
        assert!(text.contains("export interface Syrups {\n  type: 'Syrups';\n  name: 'vanilla syrup';\n}"));
    }

    #[test]
    fn renders_dimension_aliases_and_header() {
        let text = rendered();
        assert!(text.starts_with(HEADER));
        assert!(text.contains("export interface LineItem {\n  product: Product;\n  quantity: number;\n}"));
        assert!(text.contains("export type CoffeeTemperature = 'hot' | 'iced';"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn empty_unions_render_as_never() {
        let text = render_typescript(&ProductTable::default());
        assert!(text.contains("export type Product = never;"));
    }
}
