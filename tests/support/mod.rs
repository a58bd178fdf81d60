#![allow(dead_code)]

use anyhow::{Context, Result};
use menubridge::Menu;
use menubridge::catalog::{CatalogSpec, parse_catalog};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

/// Catalog shipped with the crate.
pub fn bundled_catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("catalogs/coffee_menu.yaml")
}

pub fn bundled_menu() -> Result<Menu> {
    menubridge::load_menu(&bundled_catalog_path())
}

/// Small catalog with fixed pids so tests can spell out keys.
pub const SMALL_CATALOG: &str = r#"
dimensions:
  - name: coffee_temperature
    attributes: [{name: hot}, {name: iced}]
  - name: coffee_size
    attributes: [{name: short}, {name: tall}, {name: grande}, {name: venti}]
  - name: option_quantity
    attributes: [{name: "no"}, {name: light}, {name: regular}, {name: extra}]
tensors:
  - name: brewed_drink
    dimensions: [coffee_temperature, coffee_size]
  - name: option_amount
    dimensions: [option_quantity]
catalog:
  - tags: [latte_drinks]
    tensor: brewed_drink
    items:
      - name: latte
        pid: 1
      - name: mocha
        pid: 2
  - tags: [bakery_products]
    tensor: none
    items:
      - name: blueberry muffin
        pid: 3
  - type: option
    tags: [drink_add_ons]
    items:
      - tags: [syrups]
        tensor: option_amount
        items:
          - name: vanilla syrup
            pid: 7
      - tags: [toppings]
        tensor: option_amount
        items:
          - name: whipped cream
            pid: 8
rules:
  - parents: [latte_drinks]
    exclusive: [toppings]
  - parents: [latte_drinks]
    children: [toppings, syrups]
"#;

pub fn small_spec() -> Result<CatalogSpec> {
    parse_catalog(SMALL_CATALOG)
}

pub fn small_menu() -> Result<Menu> {
    Ok(Menu::build(&small_spec()?)?)
}

/// Write `contents` to a temporary catalog file that lives as long as the
/// returned handle.
pub fn catalog_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .context("creating temporary catalog")?;
    file.write_all(contents.as_bytes())
        .context("writing temporary catalog")?;
    Ok(file)
}

/// Run one of the crate's binaries with `stdin` piped in.
pub fn run_binary(name: &str, args: &[&str], stdin: &str) -> Result<Output> {
    let path = match name {
        "cart-convert" => env!("CARGO_BIN_EXE_cart-convert"),
        "menu-schema" => env!("CARGO_BIN_EXE_menu-schema"),
        other => anyhow::bail!("unknown binary {other}"),
    };
    let mut child = Command::new(path)
        .args(args)
        .env_remove("MENU_CATALOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning {name}"))?;
    if let Some(mut input) = child.stdin.take() {
        input
            .write_all(stdin.as_bytes())
            .with_context(|| format!("writing stdin for {name}"))?;
    }
    child
        .wait_with_output()
        .with_context(|| format!("waiting for {name}"))
}
