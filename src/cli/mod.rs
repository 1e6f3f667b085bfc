//! CLI commands implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;

use crate::config::AppConfig;
use crate::ocr::{OcrBackend, TesseractBackend, TextExtractor};
use crate::registry::RegistryClient;
use crate::scoring::{ContractFields, ContractScorer, HttpProbe, SafetyStatus};
use crate::store::{CompanyStore, MemoryStore, SqliteStore};

#[derive(Parser)]
#[command(name = "contracheck")]
#[command(about = "Employment contract verification and trust scoring")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from scanned contract images
    Extract {
        /// Image file(s) to process
        files: Vec<PathBuf>,
        /// Emit full extraction results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score extracted contract fields against the company registry
    Score {
        /// JSON file with extracted contract fields
        fields: PathBuf,
        /// Emit the score report as JSON
        #[arg(long)]
        json: bool,
        /// Company cache database (overrides the configured path)
        #[arg(long)]
        cache: Option<PathBuf>,
    },

    /// Check that the OCR backend is usable
    Check,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { files, json } => cmd_extract(&config, &files, json).await,
        Commands::Score {
            fields,
            json,
            cache,
        } => cmd_score(&config, &fields, json, cache.as_deref()).await,
        Commands::Check => cmd_check(&config),
    }
}

async fn cmd_extract(config: &AppConfig, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    if files.is_empty() {
        anyhow::bail!("no input files given");
    }

    let backend = Arc::new(TesseractBackend::new(
        &config.ocr.language_spec(),
        config.ocr.min_confidence,
    ));
    if !backend.is_available() {
        anyhow::bail!(backend.availability_hint());
    }
    let extractor = TextExtractor::new(backend, &config.ocr);

    let results = extractor.extract_batch(files).await;

    if json {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(path, result)| {
                serde_json::json!({
                    "file": path.display().to_string(),
                    "result": result,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut failures = 0usize;
    for (path, result) in &results {
        match &result.best {
            Some(best) => {
                println!(
                    "{} {} ({}/{}, confidence {:.2}, {} words)",
                    style("✓").green(),
                    style(path.display()).bold(),
                    best.strategy,
                    best.variant,
                    best.confidence,
                    best.word_count
                );
                println!("{}\n", best.text);
            }
            None => {
                failures += 1;
                println!(
                    "{} {}: {}",
                    style("✗").red(),
                    path.display(),
                    result.diagnostic.as_deref().unwrap_or("extraction failed")
                );
            }
        }
    }

    if failures == results.len() {
        anyhow::bail!("no text extracted from any input");
    }
    Ok(())
}

async fn cmd_score(
    config: &AppConfig,
    fields_path: &Path,
    json: bool,
    cache_override: Option<&Path>,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(fields_path)?;
    let fields: ContractFields = serde_json::from_str(&raw)?;

    let registry = Arc::new(RegistryClient::new(&config.registry)?);
    let cache_path = cache_override.or(config.cache.path.as_deref());
    let store: Arc<dyn CompanyStore> = match cache_path {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    let probe = Arc::new(HttpProbe::new(config.registry.probe_timeout())?);
    let scorer = ContractScorer::new(registry, store, probe, config.cache.ttl());

    let report = scorer.score(&fields).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", style("Contract Score Report").bold());
    for (kind, score) in &report.scores {
        println!("  {:<20} {:>4}", kind.label(), score);
    }
    println!("  {:<20} {:>4}", "Total", report.total);

    let status = match report.status {
        SafetyStatus::Safe => style("Safe").green(),
        SafetyStatus::Warning => style("Warning").yellow(),
        SafetyStatus::Unsafe => style("Unsafe").red(),
    };
    println!("\n  Status: {}", status.bold());
    Ok(())
}

fn cmd_check(config: &AppConfig) -> anyhow::Result<()> {
    let backend = TesseractBackend::new(&config.ocr.language_spec(), config.ocr.min_confidence);
    if backend.is_available() {
        println!(
            "{} {} backend available (languages: {})",
            style("✓").green(),
            backend.name(),
            config.ocr.language_spec()
        );
        Ok(())
    } else {
        println!("{} {}", style("✗").red(), backend.availability_hint());
        anyhow::bail!("OCR backend not available")
    }
}
