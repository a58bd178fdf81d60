//! Name casing shared by the schema formatter and the translators.
//!
//! Catalog tags and dimension names are written in snake or kebab case
//! (`latte_drinks`, `coffee-size`). The generated schema uses PascalCase type
//! names and camelCase property names. Both directions of translation call
//! into this module, so a change here changes the schema and the translators
//! together.

fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split(['-', '_']).filter(|segment| !segment.is_empty())
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `latte_drinks` -> `LatteDrinks`.
pub fn to_type_name(name: &str) -> String {
    segments(name).map(capitalize).collect()
}

/// `coffee_size` -> `coffeeSize`. The first segment keeps its casing.
pub fn to_property_name(name: &str) -> String {
    segments(name)
        .enumerate()
        .map(|(idx, segment)| {
            if idx == 0 {
                segment.to_string()
            } else {
                capitalize(segment)
            }
        })
        .collect()
}
