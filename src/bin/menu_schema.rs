//! Render the flat cart contract generated from a catalog.
//!
//! Usage:
//!   menu-schema
//!   menu-schema --catalog catalogs/coffee_menu.yaml --format json-schema
//!   menu-schema --output menu.ts

use anyhow::{Context, Result, bail};
use clap::Parser;
use menubridge::{load_menu, render_json_schema, render_typescript, resolve_catalog_path};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "menu-schema")]
#[command(about = "Generate the flat cart schema for a catalog")]
struct Cli {
    /// Catalog file; falls back to MENU_CATALOG and then the bundled menu.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Output format: typescript or json-schema.
    #[arg(long, value_parser = ["typescript", "json-schema"], default_value = "typescript")]
    format: String,
    /// Write to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let catalog_path = resolve_catalog_path(cli.catalog.as_deref());
    let menu = load_menu(&catalog_path)?;

    let rendered = match cli.format.as_str() {
        "typescript" => render_typescript(menu.table()),
        "json-schema" => {
            let mut text = serde_json::to_string_pretty(&render_json_schema(menu.table()))
                .context("serializing JSON Schema")?;
            text.push('\n');
            text
        }
        other => bail!("unknown format '{other}'"),
    };

    match cli.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), families = menu.table().len(), "schema written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
