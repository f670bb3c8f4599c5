//! Taxonomy linter
//!
//! Checks betting-category markdown documents for broken tables, markets
//! without options, duplicates and model statistics no market lists.
//! Also reports market names the built-in catalog does not know.
//!
//! Run with: cargo run --bin lint_taxonomy -- docs/*.md

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sports_predictor::catalog::Catalog;
use sports_predictor::taxonomy::{self, Severity};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Markdown documents, linted together
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Also warn about markets missing from the built-in catalog
    #[arg(long)]
    catalog: bool,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let docs = args
        .files
        .iter()
        .map(taxonomy::load)
        .collect::<Result<Vec<_>, _>>()?;

    let catalog = Catalog::builtin();
    let mut findings = taxonomy::lint_with_catalog(&docs, &catalog);
    if args.catalog {
        findings.extend(docs.iter().flat_map(|d| d.to_catalog_report(&catalog)));
    }

    for finding in &findings {
        println!("{}", finding);
    }

    let markets: usize = docs.iter().map(|d| d.markets().len()).sum();
    let errors = findings
        .iter()
        .filter(|f| args.strict || f.severity == Severity::Error)
        .count();
    info!(
        "{} documents, {} markets, {} findings",
        docs.len(),
        markets,
        findings.len()
    );

    if errors > 0 {
        bail!("{} problems found", errors);
    }
    Ok(())
}
