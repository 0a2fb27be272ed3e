//! Process command - extract payment details from a single email.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use paymail_core::{resolve_payment, ParseEmailResponse, ParsedPayment, PaymentSource, ResolvedPayment};

use super::load_config;
use crate::llm::{client_if_enabled, try_extract};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input email file, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Try the LLM extractor first, falling back to heuristics
    #[arg(long)]
    llm: bool,

    /// Wrap JSON output in a response envelope for this user (JSON format only)
    #[arg(long)]
    user_id: Option<String>,

    /// Show extraction confidence and source
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    if args.user_id.is_some() && !matches!(args.format, OutputFormat::Json) {
        anyhow::bail!("--user-id requires --format json");
    }

    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    info!("Processing {} ({} bytes)", args.input.display(), text.len());

    let client = client_if_enabled(&config.llm, args.llm);
    let llm_result = if client.is_some() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Querying LLM extractor...");
        let result = try_extract(client.as_ref(), &text).await;
        pb.finish_and_clear();
        result
    } else {
        None
    };

    let resolved = resolve_payment(llm_result, &text, config.extraction.preference_threshold);

    let output = match &args.user_id {
        Some(user_id) => serde_json::to_string(&ParseEmailResponse::new(
            resolved.payment.clone(),
            Some(user_id.clone()),
        ))?,
        None => format_payment(&resolved.payment, args.format)?,
    };

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

    if args.show_confidence {
        print_confidence(&resolved);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

fn print_confidence(resolved: &ResolvedPayment) {
    let source = match resolved.source {
        PaymentSource::Heuristic => "heuristic",
        PaymentSource::Probabilistic => "LLM",
    };

    println!();
    println!(
        "{} Extraction confidence: {:.0}% ({})",
        style("ℹ").blue(),
        resolved.payment.confidence * 100.0,
        source
    );

    let missing = resolved.payment.missing_fields();
    if !missing.is_empty() {
        println!("{} Not found: {}", style("ℹ").blue(), missing.join(", "));
    }
}

/// Render payment details in the requested format.
pub fn format_payment(payment: &ParsedPayment, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(payment)?),
        OutputFormat::Csv => format_csv(payment),
        OutputFormat::Text => Ok(format_text(payment)),
    }
}

fn format_csv(payment: &ParsedPayment) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["brand", "amount", "currency", "due_date", "status", "confidence"])?;
    wtr.write_record([
        payment.brand.clone().unwrap_or_default(),
        payment.amount.map(|a| a.to_string()).unwrap_or_default(),
        payment.currency.clone().unwrap_or_default(),
        payment.due_date.map(|d| d.to_string()).unwrap_or_default(),
        payment.status.map(|s| s.to_string()).unwrap_or_default(),
        format!("{:.2}", payment.confidence),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(payment: &ParsedPayment) -> String {
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let amount = payment.amount.map(|amount| match &payment.currency {
        Some(currency) => format!("{} {}", amount, currency),
        None => amount.to_string(),
    });

    let mut output = String::new();
    output.push_str(&format!("Brand:      {}\n", or_dash(payment.brand.clone())));
    output.push_str(&format!("Amount:     {}\n", or_dash(amount)));
    output.push_str(&format!(
        "Due date:   {}\n",
        or_dash(payment.due_date.map(|d| d.to_string()))
    ));
    output.push_str(&format!(
        "Status:     {}\n",
        or_dash(payment.status.map(|s| s.to_string()))
    ));
    output.push_str(&format!("Confidence: {:.2}\n", payment.confidence));

    output
}
