//! rxsynth: synthetic pharmacy customer data CLI
//!
//! Generates the synthetic user dataset, checks existing datasets against
//! the record invariants, and harvests reference fact sheets.
//!
//! Usage:
//!   cargo run -p rxsynth-cli -- generate --users 100 --seed 7
//!   cargo run -p rxsynth-cli -- verify Synthetic_User_Data.json
//!   cargo run -p rxsynth-cli -- fact-sheets --out-dir fact_sheets_pdfs

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rxsynth_contracts::error::{SynthError, SynthResult};
use rxsynth_core::{run_rng, Catalog, DatasetGenerator, DEFAULT_POPULATION};
use rxsynth_factsheets::{
    harvest::{DEFAULT_INDEX_URL, DEFAULT_LINK_PATTERN, DEFAULT_OUT_DIR},
    CurlFetcher, HarvestConfig, WkHtmlToPdf,
};
use rxsynth_store::{read_dataset, DatasetWriter};
use rxsynth_verify::DatasetVerifier;

const DEFAULT_OUTPUT: &str = "Synthetic_User_Data.json";

// ── CLI definition ────────────────────────────────────────────────────────────

/// Synthetic pharmacy customer data generator.
#[derive(Parser, Debug)]
#[command(
    name = "rxsynth",
    about = "Synthetic pharmacy customer data generator",
    long_about = "Generates synthetic pharmacy customers with identities, medical profiles,\n\
                  purchase histories and derived prescriptions, and verifies datasets\n\
                  against the record invariants."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset and write it as pretty-printed JSON.
    Generate {
        /// Number of users to generate.
        #[arg(long, default_value_t = DEFAULT_POPULATION)]
        users: u32,
        /// Seed for a reproducible run. Omit for an entropy-seeded run.
        #[arg(long)]
        seed: Option<u64>,
        /// Dataset file to write.
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Drug catalog TOML. Defaults to the built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Also write `<output>.manifest.json`.
        #[arg(long)]
        manifest: bool,
    },
    /// Check a dataset file against the schema and record invariants.
    Verify {
        /// Dataset file to check.
        path: PathBuf,
        /// Also check drugs against this catalog TOML.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Download fact-sheet pages as PDFs.
    FactSheets {
        /// Index page listing the fact sheets.
        #[arg(long, default_value = DEFAULT_INDEX_URL)]
        url: String,
        /// Substring a link must contain to be harvested.
        #[arg(long, default_value = DEFAULT_LINK_PATTERN)]
        pattern: String,
        /// Folder for the rendered PDFs.
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
        /// Path to the wkhtmltopdf executable.
        #[arg(long, default_value = "wkhtmltopdf")]
        wkhtmltopdf: String,
        /// Path to the curl executable.
        #[arg(long, default_value = "curl")]
        curl: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=info (or debug) for progress output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate {
            users,
            seed,
            output,
            catalog,
            manifest,
        } => run_generate(users, seed, &output, catalog.as_deref(), manifest),
        Command::Verify {
            path,
            catalog,
            json,
        } => run_verify(&path, catalog.as_deref(), json),
        Command::FactSheets {
            url,
            pattern,
            out_dir,
            wkhtmltopdf,
            curl,
        } => run_fact_sheets(
            HarvestConfig {
                index_url: url,
                link_pattern: pattern,
                out_dir,
            },
            &curl,
            &wkhtmltopdf,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn load_catalog(path: Option<&Path>) -> SynthResult<Catalog> {
    match path {
        Some(path) => Catalog::from_file(path),
        None => Ok(Catalog::builtin()),
    }
}

fn run_generate(
    users: u32,
    seed: Option<u64>,
    output: &Path,
    catalog: Option<&Path>,
    with_manifest: bool,
) -> SynthResult<()> {
    let generator = DatasetGenerator::new(load_catalog(catalog)?);
    let mut rng = run_rng(seed);
    info!(users, ?seed, now = %generator.now(), "generating dataset");

    let records = generator.generate(users, &mut rng)?;

    let writer = DatasetWriter::new();
    let mut manifest = writer.write(output, &records)?;
    manifest.seed = seed;

    println!(
        "Generated {} users -> {}",
        manifest.user_count,
        manifest.path.display()
    );
    println!("sha256 {}", manifest.sha256);

    if with_manifest {
        let sidecar = writer.write_manifest(&manifest)?;
        println!("manifest {}", sidecar.display());
    }
    Ok(())
}

fn run_verify(path: &Path, catalog: Option<&Path>, json: bool) -> SynthResult<()> {
    let dataset = read_dataset(path)?;

    let mut verifier = DatasetVerifier::new();
    if let Some(catalog) = catalog {
        verifier = verifier.with_catalog(Catalog::from_file(catalog)?);
    }
    let report = verifier.verify_value(&dataset)?;

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| SynthError::SerializationFailed {
            reason: e.to_string(),
        })?;
        println!("{text}");
    } else {
        for failure in &report.failures {
            match &failure.user_id {
                Some(user) => println!("[{}] {}: {}", failure.rule_id, user, failure.message),
                None => println!("[{}] {}", failure.rule_id, failure.message),
            }
        }
        println!(
            "{} users checked, {} failure(s)",
            report.users_checked,
            report.failures.len()
        );
    }

    if report.passed {
        Ok(())
    } else {
        Err(SynthError::VerificationFailed {
            reason: format!(
                "{} failed verification with {} failure(s)",
                path.display(),
                report.failures.len()
            ),
        })
    }
}

fn run_fact_sheets(config: HarvestConfig, curl: &str, wkhtmltopdf: &str) -> SynthResult<()> {
    let report = rxsynth_factsheets::harvest(
        &config,
        &CurlFetcher::new(curl),
        &WkHtmlToPdf::new(wkhtmltopdf),
    )?;

    for (url, reason) in &report.failed {
        println!("failed {url}: {reason}");
    }
    println!(
        "Saved {} of {} fact sheets to {}",
        report.rendered.len(),
        report.found,
        config.out_dir.display()
    );
    Ok(())
}
