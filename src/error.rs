//! Error kinds for catalog compilation and cart translation.
//!
//! `CatalogError` values are fatal: a catalog that fails to compile must not
//! serve any carts. `TranslationError` values describe a single line item and
//! never poison shared state, so callers can keep converting sibling items.

use crate::catalog::ProductId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("duplicate product \"{name}\": {detail}")]
    DuplicateProduct { name: String, detail: String },

    #[error("group \"{group}\" references unknown tensor \"{tensor}\"")]
    UnknownTensor { group: String, tensor: String },

    #[error("tensor \"{tensor}\" references unknown dimension \"{dimension}\"")]
    UnknownDimension { tensor: String, dimension: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranslationError {
    #[error("malformed key \"{key}\": {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("key \"{key}\" references unknown product id {pid}")]
    UnknownProductId { key: String, pid: ProductId },

    #[error("generic \"{name}\" does not belong to any schema family")]
    UnresolvedFamily { name: String },

    #[error("key \"{key}\" for {family} has {found} attribute field(s), expected {expected}")]
    KeyArity {
        family: String,
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("{family}.{property}: offset {offset} out of range for dimension \"{dimension}\" ({len} attribute(s))")]
    AttributeIndexOutOfRange {
        family: String,
        property: String,
        dimension: String,
        offset: usize,
        len: usize,
    },

    #[error("unknown generic name \"{name}\"")]
    UnknownGenericName { name: String },

    #[error("\"{name}\" is declared as {declared} but belongs to {expected}")]
    TypeMismatch {
        name: String,
        declared: String,
        expected: String,
    },

    #[error("{family}: missing attribute \"{property}\"")]
    MissingAttributeValue { family: String, property: String },

    #[error("{family}.{property}: \"{value}\" is not a legal value of dimension \"{dimension}\"")]
    UnknownAttributeValue {
        family: String,
        property: String,
        dimension: String,
        value: String,
    },

    #[error("{family}: unexpected attribute \"{property}\"")]
    UnexpectedAttribute { family: String, property: String },

    #[error("{family} is an option family and cannot be a line item")]
    NotTopLevel { family: String },

    #[error("{option} is not an option of {parent}")]
    OptionNotAllowed { parent: String, option: String },

    #[error("internal translation failure: {detail}")]
    Internal { detail: String },
}
