//! Catalog compiler: group tree in, product table out.
//!
//! The group tree is walked depth-first with an explicit worklist. Option
//! groups mark everything beneath them as add-ons and push their own tags onto
//! the tag list their descendants inherit. Tagged leaf groups become product
//! families; untagged plain groups are passed over.
//!
//! Composition rules are applied after the table is complete: every
//! exclusion rule first, then every inclusion rule, so an excluded family is
//! never also offered as an option.

use crate::casing::to_property_name;
use crate::catalog::model::{CatalogNode, CatalogSpec, GroupKind, GroupSpec, RuleSpec};
use crate::catalog::table::{Dimension, ProductFamily, ProductTable};
use crate::catalog::tags::TagIndex;
use crate::error::CatalogError;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Field names every flat product already carries.
const RESERVED_PROPERTIES: [&str; 3] = ["type", "name", "options"];

struct Frame<'c> {
    group: &'c GroupSpec,
    inherited: Vec<String>,
    is_option: bool,
}

/// Build the product table for `catalog`, including exclusions and options.
pub fn compile(catalog: &CatalogSpec) -> Result<ProductTable, CatalogError> {
    compile_indexed(catalog).map(|(table, _)| table)
}

/// Like [`compile`], but also hands back the tag index the rules were
/// resolved against.
pub(crate) fn compile_indexed(
    catalog: &CatalogSpec,
) -> Result<(ProductTable, TagIndex), CatalogError> {
    let dimensions = catalog
        .dimensions
        .iter()
        .map(|spec| Dimension {
            name: spec.name.clone(),
            attributes: spec.attributes.iter().map(|a| a.name.clone()).collect(),
        })
        .collect();

    let mut table = ProductTable::new(dimensions);
    for family in collect_families(catalog)? {
        table.insert(family)?;
    }

    let index = TagIndex::build(&table);
    apply_rules(&mut table, &index, &catalog.rules);

    info!(
        families = table.len(),
        top_level = table.top_level().count(),
        rules = catalog.rules.len(),
        "compiled product table"
    );
    Ok((table, index))
}

fn collect_families(catalog: &CatalogSpec) -> Result<Vec<ProductFamily>, CatalogError> {
    let mut families = Vec::new();
    let mut worklist: Vec<Frame<'_>> = catalog
        .catalog
        .iter()
        .rev()
        .map(|group| Frame {
            group,
            inherited: Vec::new(),
            is_option: false,
        })
        .collect();

    while let Some(Frame {
        group,
        inherited,
        is_option,
    }) = worklist.pop()
    {
        match group.kind {
            GroupKind::Option => {
                let mut tags = group.tags.clone().unwrap_or_default();
                tags.extend(inherited);
                // Reversed so the worklist pops children in catalog order.
                for node in group.items.iter().rev() {
                    match node {
                        CatalogNode::Group(child) => worklist.push(Frame {
                            group: child,
                            inherited: tags.clone(),
                            is_option: true,
                        }),
                        CatalogNode::Item(item) => {
                            debug!(
                                group = %group.label(),
                                item = %item.name,
                                "ignoring bare item in option group"
                            );
                        }
                    }
                }
            }
            GroupKind::Group => match group.tags.as_deref() {
                Some(own) => families.push(to_family(catalog, group, own, inherited, is_option)?),
                None => debug!(group = %group.label(), "skipping untagged group"),
            },
        }
    }

    Ok(families)
}

fn to_family(
    catalog: &CatalogSpec,
    group: &GroupSpec,
    own: &[String],
    inherited: Vec<String>,
    is_option: bool,
) -> Result<ProductFamily, CatalogError> {
    let [name] = own else {
        return Err(CatalogError::MalformedCatalog(format!(
            "group \"{}\" must carry exactly one tag, found {}",
            group.label(),
            own.len()
        )));
    };

    let mut values = Vec::with_capacity(group.items.len());
    for node in &group.items {
        match node {
            CatalogNode::Item(item) => values.push(item.name.clone()),
            CatalogNode::Group(nested) => {
                return Err(CatalogError::MalformedCatalog(format!(
                    "product group \"{}\" contains nested group \"{}\"",
                    group.label(),
                    nested.label()
                )));
            }
        }
    }

    let dimensions = match group.tensor_ref() {
        Some(tensor) => tensor_dimensions(catalog, group, tensor)?,
        None => Vec::new(),
    };

    let mut tags = vec![name.clone()];
    tags.extend(inherited);

    Ok(ProductFamily {
        name: name.clone(),
        values,
        tensor: group.tensor_ref().map(str::to_string),
        dimensions,
        exclusives: Vec::new(),
        options: Vec::new(),
        tags,
        is_option,
    })
}

fn tensor_dimensions(
    catalog: &CatalogSpec,
    group: &GroupSpec,
    tensor: &str,
) -> Result<Vec<String>, CatalogError> {
    let Some(spec) = catalog.tensors.iter().find(|t| t.name == tensor) else {
        return Err(CatalogError::UnknownTensor {
            group: group.label(),
            tensor: tensor.to_string(),
        });
    };
    let mut properties = BTreeSet::new();
    for dimension in &spec.dimensions {
        if !catalog.dimensions.iter().any(|d| &d.name == dimension) {
            return Err(CatalogError::UnknownDimension {
                tensor: spec.name.clone(),
                dimension: dimension.clone(),
            });
        }
        // Attributes are flattened next to the fixed product fields and keyed
        // by property name, so each name must be unique within the tensor.
        let property = to_property_name(dimension);
        if RESERVED_PROPERTIES.contains(&property.as_str()) {
            return Err(CatalogError::MalformedCatalog(format!(
                "tensor \"{}\": dimension \"{dimension}\" uses reserved property \"{property}\"",
                spec.name
            )));
        }
        if properties.contains(&property) {
            return Err(CatalogError::MalformedCatalog(format!(
                "tensor \"{}\": dimension \"{dimension}\" repeats property \"{property}\"",
                spec.name
            )));
        }
        properties.insert(property);
    }
    Ok(spec.dimensions.clone())
}

fn apply_rules(table: &mut ProductTable, index: &TagIndex, rules: &[RuleSpec]) {
    for rule in rules {
        if let RuleSpec::Exclusive { parents, exclusive } = rule {
            fan_out(table, index, parents, exclusive, |parent, child| {
                parent.add_exclusive(child);
            });
        }
    }
    for rule in rules {
        if let RuleSpec::Children { parents, children } = rule {
            fan_out(table, index, parents, children, |parent, child| {
                if !parent.add_option(child) {
                    debug!(parent = %parent.name, child, "option suppressed by exclusion or duplicate");
                }
            });
        }
    }
}

fn fan_out(
    table: &mut ProductTable,
    index: &TagIndex,
    parents: &[String],
    children: &[String],
    mut link: impl FnMut(&mut ProductFamily, &str),
) {
    let parent_ids = index.resolve(parents);
    let child_names: Vec<String> = index
        .resolve(children)
        .into_iter()
        .map(|idx| table.family_at(idx).name.clone())
        .collect();

    if parent_ids.is_empty() || child_names.is_empty() {
        debug!(?parents, ?children, "rule matches no families");
        return;
    }

    for idx in parent_ids {
        let parent = table.family_at_mut(idx);
        for child in &child_names {
            link(parent, child);
        }
    }
}
