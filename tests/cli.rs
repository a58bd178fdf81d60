// CLI guard rails for menu-schema and cart-convert.
mod support;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

use support::{bundled_catalog_path, run_binary};

fn catalog_arg() -> String {
    bundled_catalog_path().display().to_string()
}

fn stdout_lines(output: &std::process::Output) -> Result<Vec<Value>> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).context("parsing stdout line"))
        .collect()
}

#[test]
fn menu_schema_prints_typescript() -> Result<()> {
    let catalog = catalog_arg();
    let output = run_binary("menu-schema", &["--catalog", &catalog], "")?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = String::from_utf8(output.stdout)?;
    assert!(text.contains("export interface Cart {"));
    assert!(text.contains("export interface LatteDrinks {"));
    Ok(())
}

#[test]
fn menu_schema_writes_json_schema_file() -> Result<()> {
    let catalog = catalog_arg();
    let temp = TempDir::new().context("allocating temp dir")?;
    let target = temp.path().join("cart.schema.json");
    let target_arg = target.display().to_string();
    let output = run_binary(
        "menu-schema",
        &["--catalog", &catalog, "--format", "json-schema", "--output", &target_arg],
        "",
    )?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let schema: Value = serde_json::from_str(&fs::read_to_string(&target)?)?;
    assert_eq!(schema["title"], "Cart");
    assert!(schema["definitions"]["EspressoDrinks"].is_object());
    Ok(())
}

#[test]
fn menu_schema_fails_on_missing_catalog() -> Result<()> {
    let output = run_binary("menu-schema", &["--catalog", "no/such/catalog.yaml"], "")?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no/such/catalog.yaml"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn cart_convert_round_trips_through_both_directions() -> Result<()> {
    let catalog = catalog_arg();
    let flat = json!({"items": [
        {"product": {"type": "CoffeeDrinks", "name": "americano", "coffeeTemperature": "hot",
            "coffeeSize": "tall", "options": [{"type": "Creamers", "name": "half and half"}]},
         "quantity": 2},
        {"product": {"type": "BakeryProducts", "name": "lemon poppyseed muffin",
            "options": [{"type": "BakeryPreparations", "name": "warmed"}]},
         "quantity": 1}
    ]});

    let encoded = run_binary(
        "cart-convert",
        &["--to", "internal", "--catalog", &catalog, "--validate"],
        &flat.to_string(),
    )?;
    assert!(encoded.status.success(), "stderr: {}", String::from_utf8_lossy(&encoded.stderr));
    let internal = stdout_lines(&encoded)?;
    assert_eq!(internal.len(), 1);
    assert_eq!(internal[0]["items"][0]["children"].as_array().map(Vec::len), Some(1));

    let decoded = run_binary(
        "cart-convert",
        &["--to", "flat", "--catalog", &catalog, "--validate"],
        &internal[0].to_string(),
    )?;
    assert!(decoded.status.success(), "stderr: {}", String::from_utf8_lossy(&decoded.stderr));
    assert_eq!(stdout_lines(&decoded)?, vec![flat]);
    Ok(())
}

#[test]
fn cart_convert_keeps_siblings_of_bad_items() -> Result<()> {
    let catalog = catalog_arg();
    let input = [
        json!({"items": [
            {"product": {"type": "BakeryProducts", "name": "blueberry muffin"}, "quantity": 1}
        ]}),
        json!({"items": [
            {"product": {"type": "LatteDrinks", "name": "latte", "coffeeTemperature": "lukewarm",
                "coffeeSize": "tall"}, "quantity": 1},
            {"product": {"type": "BakeryProducts", "name": "apple bran muffin"}, "quantity": 4}
        ]}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let output = run_binary("cart-convert", &["--to", "internal", "--catalog", &catalog], &input)?;
    assert!(!output.status.success());

    let carts = stdout_lines(&output)?;
    assert_eq!(carts.len(), 2);
    assert_eq!(carts[1]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(carts[1]["items"][0]["quantity"], 4);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cart 1 item 0"), "stderr: {stderr}");
    assert!(stderr.contains("lukewarm"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn cart_convert_validate_rejects_schema_violations() -> Result<()> {
    let catalog = catalog_arg();
    let input = json!({"items": [
        {"product": {"type": "LatteDrinks", "name": "latte", "flavor": "pumpkin"}, "quantity": 1}
    ]});
    let output = run_binary(
        "cart-convert",
        &["--to", "internal", "--catalog", &catalog, "--validate"],
        &input.to_string(),
    )?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cart 0"), "stderr: {stderr}");
    Ok(())
}
