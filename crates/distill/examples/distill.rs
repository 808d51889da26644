//! Example: Distill a text file with the bundled ruleset and mappings.
//!
//! Usage:
//!   cargo run --example distill -- <file_path> [config.json]
//!
//! Set `RUST_LOG=distill=debug` to watch the fixpoint rounds.

use std::env;
use std::fs::File;
use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distill::annotation::{self, Annotation};
use distill::{Distiller, DistillerConfig, Document, RuleDistiller};

fn main() -> distill::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distill=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example distill -- <file_path> [config.json]");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let config = match args.get(2) {
        Some(config_path) => DistillerConfig::load(config_path)?,
        None => DistillerConfig::default(),
    };

    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let format = annotation::formats()
        .for_file_name(&file_name)
        .ok_or_else(|| distill::DistillError::FormatNotFound(file_name.to_string()))?;

    let file = File::open(path).map_err(|e| distill::DistillError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let annotation = Annotation::read(file, format)?;

    let mut doc = Document::from_annotation(annotation);
    doc.set_id(path.display().to_string());

    let distiller = RuleDistiller::from_config(&config)?;
    let report = distiller.distill(&mut doc, &config.options())?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Distillation: {}", path.display());
    println!("{}", separator);
    println!("  Format: {}", format);
    println!("  KEM statements: {}", report.num_kem);
    println!("  Mapping statements: {}", report.num_mapping);
    println!("  Distilled statements: {}", report.num_distilled);
    println!("  Elapsed: {} ms", report.elapsed_ms);
    println!();
    print!("{}", doc.graph().to_ntriples());

    Ok(())
}
