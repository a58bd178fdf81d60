//! Compiled JSON Schema validator for flat cart documents.

use crate::catalog::ProductTable;
use crate::schema::json::render_json_schema;
use anyhow::{Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

/// The rendered cart schema together with its compiled validator.
pub struct CartSchema {
    compiled: JSONSchema,
}

impl CartSchema {
    /// Render the cart schema for `table` and compile it once.
    pub fn for_table(table: &ProductTable) -> Result<Self> {
        let schema = render_json_schema(table);
        let compiled = JSONSchema::compile(&schema)
            .map_err(|err| anyhow!("compiling cart schema: {err}"))?;
        Ok(Self { compiled })
    }

    /// Cheap yes/no check; use [`CartSchema::validate`] for the reasons.
    pub fn is_valid(&self, document: &Value) -> bool {
        self.compiled.is_valid(document)
    }

    /// Validate one flat cart, reporting every violation on its own line.
    pub fn validate(&self, document: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(document) {
            let details = errors
                .map(|err| format!("{}: {err}", err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("cart failed schema validation:\n{}", details);
        }
        Ok(())
    }
}
