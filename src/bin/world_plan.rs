//! Offline planning pass over a world catalog.
//!
//! Loads and validates a catalog, probes backing storage only, and reports
//! what a live reconciliation pass would do with each entry, without
//! touching any host runtime. One JSON record per world on stdout plus a
//! trailing summary record, so the output can be piped straight into the
//! usual line-oriented tooling.

use anyhow::Result;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use worldkeeper::{WorldStore, load_catalog_from_path, storage_root_from_env};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args();
    let catalog = load_catalog_from_path(&args.catalog)?;
    let store = WorldStore::new(args.root);

    let mut present = 0usize;
    let mut missing = 0usize;
    for spec in &catalog.worlds {
        let storage_present = store.exists(&spec.name);
        if storage_present {
            present += 1;
        } else {
            missing += 1;
        }
        let record = PlanRecord {
            world: &spec.name,
            environment: spec.environment.as_str(),
            generator: spec.generator.as_deref(),
            storage: if storage_present { "present" } else { "missing" },
            action: if storage_present { "reconcile" } else { "skip" },
        };
        println!("{}", serde_json::to_string(&record)?);
    }

    let summary = PlanSummary {
        worlds: catalog.worlds.len(),
        storage_present: present,
        storage_missing: missing,
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

#[derive(Serialize)]
struct PlanRecord<'a> {
    world: &'a str,
    environment: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    generator: Option<&'a str>,
    storage: &'static str,
    action: &'static str,
}

#[derive(Serialize)]
struct PlanSummary {
    worlds: usize,
    storage_present: usize,
    storage_missing: usize,
}

struct Args {
    catalog: PathBuf,
    root: PathBuf,
}

fn parse_args() -> Args {
    let mut args = env::args_os().skip(1);
    let catalog = match args.next() {
        Some(value) if value != "-h" && value != "--help" => PathBuf::from(value),
        _ => usage_and_exit(),
    };
    let root = match args.next() {
        Some(value) => PathBuf::from(value),
        None => storage_root_from_env("."),
    };
    if args.next().is_some() {
        usage_and_exit();
    }
    Args { catalog, root }
}

fn usage_and_exit() -> ! {
    eprintln!("Usage: world-plan CATALOG.json [STORAGE_ROOT]");
    eprintln!("STORAGE_ROOT defaults to WORLDKEEPER_ROOT, then the current directory.");
    std::process::exit(1);
}
