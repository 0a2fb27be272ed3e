//! Batch processing command for multiple email files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use paymail_core::models::config::PaymailConfig;
use paymail_core::{resolve_payment, ParsedPayment, PaymentSource, ResolvedPayment};

use super::load_config;
use super::process::{format_payment, OutputFormat};
use crate::llm::{client_if_enabled, try_extract, LlmClient};

const EMAIL_EXTENSIONS: [&str; 2] = ["txt", "eml"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: JSON lines on stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Try the LLM extractor first, falling back to heuristics
    #[arg(long)]
    llm: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    resolved: Option<ResolvedPayment>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One line of streamed output.
#[derive(Serialize)]
struct BatchLine<'a> {
    file: String,
    source: PaymentSource,
    data: &'a ParsedPayment,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = collect_files(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} emails")?
            .progress_chars("=>-"),
    );

    let client = client_if_enabled(&config.llm, args.llm);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, client.as_ref(), &config).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(resolved) => {
                pb.suspend(|| emit_output(&path, &resolved, &args))?;
                results.push(ProcessResult {
                    path,
                    resolved: Some(resolved),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        resolved: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&results, start);

    Ok(())
}

fn collect_files(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            EMAIL_EXTENSIONS.contains(&ext.as_str())
        })
        .collect();

    files.sort();
    Ok(files)
}

async fn process_single_file(
    path: &Path,
    client: Option<&LlmClient>,
    config: &PaymailConfig,
) -> anyhow::Result<ResolvedPayment> {
    let text = fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());

    let llm_result = try_extract(client, &text).await;

    Ok(resolve_payment(
        llm_result,
        &text,
        config.extraction.preference_threshold,
    ))
}

fn emit_output(path: &Path, resolved: &ResolvedPayment, args: &BatchArgs) -> anyhow::Result<()> {
    let Some(output_dir) = &args.output_dir else {
        let line = BatchLine {
            file: path.display().to_string(),
            source: resolved.source,
            data: &resolved.payment,
        };
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    };

    let output_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("email");
    let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

    fs::write(&output_path, format_payment(&resolved.payment, args.format)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn print_report(results: &[ProcessResult], start: Instant) {
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let succeeded = results.len() - failed.len();
    let from_llm = results
        .iter()
        .filter_map(|r| r.resolved.as_ref())
        .filter(|r| r.source == PaymentSource::Probabilistic)
        .count();

    eprintln!();
    eprintln!(
        "{} Processed {} emails in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful ({} via LLM), {} failed",
        style(succeeded).green(),
        from_llm,
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "source",
        "brand",
        "amount",
        "currency",
        "due_date",
        "payment_status",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(resolved) = &result.resolved {
            let payment = &resolved.payment;
            let source = match resolved.source {
                PaymentSource::Heuristic => "heuristic",
                PaymentSource::Probabilistic => "probabilistic",
            };

            wtr.write_record([
                filename,
                "success",
                source,
                payment.brand.as_deref().unwrap_or(""),
                &payment.amount.map(|a| a.to_string()).unwrap_or_default(),
                payment.currency.as_deref().unwrap_or(""),
                &payment.due_date.map(|d| d.to_string()).unwrap_or_default(),
                payment.status.map(|s| s.as_str()).unwrap_or(""),
                &format!("{:.2}", payment.confidence),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
