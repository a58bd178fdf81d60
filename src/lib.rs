//! Catalog-driven translation between flat menu carts and composite-key carts.
//!
//! A YAML product catalog is compiled once into a [`Menu`]. From it the crate
//! renders the flat cart contract (TypeScript declarations or JSON Schema)
//! and builds [`Translator`]s that convert carts in either direction. The
//! `menu-schema` and `cart-convert` binaries are thin CLIs over this library.

pub mod casing;
pub mod catalog;
pub mod error;
pub mod schema;
pub mod translate;

pub use catalog::{CatalogSpec, DEFAULT_CATALOG_PATH, Menu, load_catalog_from_path};
pub use error::{CatalogError, TranslationError};
pub use schema::{CartSchema, render_json_schema, render_typescript};
pub use translate::{FlatCart, InternalCart, Translator, run_batch};

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::debug;

const CATALOG_ENV: &str = "MENU_CATALOG";

/// Pick the catalog file: an explicit path wins, then `MENU_CATALOG`, then the
/// build-time hint, then the bundled default relative to the working directory.
pub fn resolve_catalog_path(explicit: Option<&Path>) -> PathBuf {
    let from_env = env::var(CATALOG_ENV).ok();
    choose_catalog_path(
        explicit,
        from_env.as_deref(),
        option_env!("MENU_CATALOG_HINT"),
    )
}

fn choose_catalog_path(
    explicit: Option<&Path>,
    from_env: Option<&str>,
    hint: Option<&str>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = from_env.filter(|value| !value.trim().is_empty()) {
        debug!(path, "catalog taken from {CATALOG_ENV}");
        return PathBuf::from(path);
    }
    if let Some(path) = hint.filter(|value| !value.is_empty()) {
        debug!(path, "catalog taken from build-time hint");
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

/// Load and compile the catalog at `path`.
pub fn load_menu(path: &Path) -> Result<Menu> {
    let spec = load_catalog_from_path(path)?;
    Menu::build(&spec).with_context(|| format!("compiling catalog {}", path.display()))
}

/// Parse stdin-style input holding one JSON document, a JSON array of
/// documents, or newline-delimited documents.
pub fn parse_json_stream<T: DeserializeOwned>(input: &str) -> Result<Vec<T>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("No input provided");
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<_>, _>>()
                .context("Unable to parse JSON array of carts"),
            Value::Object(_) => serde_json::from_value(value)
                .map(|cart| vec![cart])
                .context("Unable to parse cart"),
            _ => bail!("Unsupported JSON input; expected object or array"),
        };
    }

    let mut records = Vec::new();
    for (idx, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(line)
            .with_context(|| format!("Unable to parse cart from line {}", idx + 1))?;
        records.push(record);
    }

    if records.is_empty() {
        bail!("No carts found in input stream");
    }

    Ok(records)
}
