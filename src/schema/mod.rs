//! Generated schema artifacts for the flat cart contract.
//!
//! Both renderers are pure functions of the product table. Type and property
//! names come from [`crate::casing`], the same transform the translators use
//! when mapping `type` discriminants back to families.

pub mod json;
pub mod typescript;
pub mod validate;

pub use json::render_json_schema;
pub use typescript::render_typescript;
pub use validate::CartSchema;
