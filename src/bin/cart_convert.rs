//! Translate carts between the flat schema and composite-key form.
//!
//! Usage:
//!   cart-convert --to internal --file carts.ndjson
//!   cart-convert --to flat --catalog catalogs/coffee_menu.yaml < internal.json
//!   cart-convert --to internal --validate < flat.json
//!
//! Input is one cart object, a JSON array of carts, or NDJSON. Each converted
//! cart is printed on its own line. Items and carts that fail are reported on
//! stderr; their siblings still convert, and the exit status is non-zero.

use anyhow::{Context, Result, bail};
use clap::Parser;
use menubridge::catalog::SequentialIds;
use menubridge::translate::{BatchReport, CartOutcome};
use menubridge::{
    CartSchema, FlatCart, InternalCart, Translator, load_menu, parse_json_stream,
    resolve_catalog_path, run_batch,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cart-convert")]
#[command(about = "Translate carts between flat schema and composite keys")]
struct Cli {
    /// Output form: flat (decode internal carts) or internal (encode flat carts).
    #[arg(long, value_parser = ["flat", "internal"])]
    to: String,
    /// Catalog file; falls back to MENU_CATALOG and then the bundled menu.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Optional input file; reads stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Check flat carts (input when encoding, output when decoding) against the generated JSON Schema.
    #[arg(long)]
    validate: bool,
    /// First uid handed out to encoded line items.
    #[arg(long, default_value_t = 0)]
    first_uid: u64,
}

#[derive(Serialize)]
struct Items<'r, T> {
    items: &'r [T],
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let catalog_path = resolve_catalog_path(cli.catalog.as_deref());
    let menu = load_menu(&catalog_path)?;
    let schema = if cli.validate {
        Some(CartSchema::for_table(menu.table())?)
    } else {
        None
    };

    let input = read_input(cli.file.as_deref())?;
    let documents: Vec<Value> = parse_json_stream(&input)?;
    info!(carts = documents.len(), catalog = %catalog_path.display(), "converting");

    let ids = SequentialIds::starting_at(cli.first_uid);
    let translator = Translator::new(&menu, &ids);
    let mut out = io::stdout().lock();

    let problems = match cli.to.as_str() {
        "internal" => encode_documents(&translator, schema.as_ref(), &documents, &mut out)?,
        "flat" => decode_documents(&translator, schema.as_ref(), &documents, &mut out)?,
        other => bail!("unknown target form '{other}'"),
    };
    out.flush().context("flushing stdout")?;

    if problems > 0 {
        bail!("{problems} problem(s) while converting; see stderr for details");
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading input file {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin for input carts")?;
            Ok(buf)
        }
    }
}

fn encode_documents(
    translator: &Translator<'_>,
    schema: Option<&CartSchema>,
    documents: &[Value],
    out: &mut impl Write,
) -> Result<usize> {
    let mut problems = 0;
    let mut carts = Vec::with_capacity(documents.len());
    for (idx, document) in documents.iter().enumerate() {
        if let Some(schema) = schema {
            if let Err(err) = schema.validate(document) {
                eprintln!("cart-convert: cart {idx}: {err:#}");
                problems += 1;
                continue;
            }
        }
        match serde_json::from_value::<FlatCart>(document.clone()) {
            Ok(cart) => carts.push((idx, cart)),
            Err(err) => {
                eprintln!("cart-convert: cart {idx}: not a flat cart: {err}");
                problems += 1;
            }
        }
    }

    let batch = run_batch(&carts, |(_, cart)| translator.encode_lenient(cart));
    problems += emit(&carts, &batch, out, |_| Ok(()))?;
    Ok(problems)
}

fn decode_documents(
    translator: &Translator<'_>,
    schema: Option<&CartSchema>,
    documents: &[Value],
    out: &mut impl Write,
) -> Result<usize> {
    let mut problems = 0;
    let mut carts = Vec::with_capacity(documents.len());
    for (idx, document) in documents.iter().enumerate() {
        match serde_json::from_value::<InternalCart>(document.clone()) {
            Ok(cart) => carts.push((idx, cart)),
            Err(err) => {
                eprintln!("cart-convert: cart {idx}: not an internal cart: {err}");
                problems += 1;
            }
        }
    }

    let batch = run_batch(&carts, |(_, cart)| translator.decode_lenient(cart));
    problems += emit(&carts, &batch, out, |flat| match schema {
        Some(schema) => schema.validate(flat),
        None => Ok(()),
    })?;
    Ok(problems)
}

/// Print each converted cart as one JSON line and report its failures.
/// Returns the number of failed items, aborted carts and rejected outputs.
fn emit<C, T: Serialize>(
    carts: &[(usize, C)],
    batch: &BatchReport<T>,
    out: &mut impl Write,
    check: impl Fn(&Value) -> Result<()>,
) -> Result<usize> {
    let mut problems = 0;
    for ((idx, _), outcome) in carts.iter().zip(&batch.carts) {
        let report = match outcome {
            CartOutcome::Converted { report } => report,
            CartOutcome::Aborted { error } => {
                eprintln!("cart-convert: cart {idx}: aborted: {error}");
                problems += 1;
                continue;
            }
        };
        for failure in &report.failures {
            eprintln!("cart-convert: cart {idx} item {}: {}", failure.index, failure.error);
        }
        problems += report.failures.len();

        let converted = serde_json::to_value(Items {
            items: &report.converted,
        })
        .context("serializing converted cart")?;
        if let Err(err) = check(&converted) {
            eprintln!("cart-convert: cart {idx}: {err:#}");
            problems += 1;
            continue;
        }
        serde_json::to_writer(&mut *out, &converted).context("writing converted cart")?;
        writeln!(out).context("writing converted cart")?;
    }
    Ok(problems)
}
