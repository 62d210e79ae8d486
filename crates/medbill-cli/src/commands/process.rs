//! Process command - analyze a single bill file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use medbill_core::{BillAnalyzer, DocumentKind, RiskLevel};

use crate::output::{render, OutputFormat};

use super::{load_config, load_document, LazyEngine};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (text, PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Exit with an error when the risk band reaches this level (low, medium, high)
    #[arg(long)]
    fail_on: Option<RiskLevel>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if DocumentKind::from_path(&args.input).is_none() {
        anyhow::bail!(
            "Unsupported file format: {}",
            args.input.extension().and_then(|e| e.to_str()).unwrap_or("<none>")
        );
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading document...");
    pb.set_position(30);

    let mut engine = LazyEngine::new(args.model_dir.as_ref(), &config);
    let document = load_document(&args.input, &mut engine)?;

    if let Some(ms) = document.ocr_time_ms {
        debug!("OCR took {}ms", ms);
    }

    pb.set_message("Extracting bill data...");
    pb.set_position(70);

    let analysis = BillAnalyzer::from_config(&config).analyze(&document.text);

    pb.finish_and_clear();

    let output = render(&analysis, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if let Some(fail_on) = args.fail_on {
        if analysis.risk >= fail_on {
            anyhow::bail!(
                "{} (fraud score {})",
                analysis.risk,
                analysis.validation.fraud_score
            );
        }
    }

    Ok(())
}
