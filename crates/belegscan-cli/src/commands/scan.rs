//! Scan command - extract and review a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use belegscan_core::{
    AccountChart, GeminiClassifier, InvoiceData, InvoiceExtractor, InvoiceReview, ReviewPhase,
    encode_file, mime_for_extension,
};

use super::config::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file (PNG, JPEG, WEBP or PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Reassign a line item's account after extraction, e.g. --assign 1=5300
    #[arg(long, value_name = "POS=ACCOUNT")]
    assign: Vec<String>,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Review grid as plain text
    Text,
    /// JSON output
    Json,
    /// CSV line-item export
    Csv,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    // Reject anything that is not an accepted media type before encoding
    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let Some(mime_type) = mime_for_extension(&extension) else {
        anyhow::bail!(
            "Unsupported file format: {} (expected png, jpg, jpeg, webp or pdf)",
            extension
        );
    };

    let api_key = config.resolve_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured. Set GEMINI_API_KEY or run \
             'belegscan config set classifier.api_key <KEY>'."
        )
    })?;

    info!("Scanning file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    pb.set_message("Encoding document...");
    let document = encode_file(&args.input, mime_type)?;

    let model = args.model.unwrap_or_else(|| config.classifier.model.clone());
    let classifier = GeminiClassifier::new(api_key)
        .with_model(model)
        .with_base_url(config.classifier.base_url.clone());
    let extractor = InvoiceExtractor::new(classifier, AccountChart::standard());

    pb.set_message("Analyzing invoice...");
    let mut review = InvoiceReview::new();
    let generation = review.begin(document.clone());
    let result = extractor.extract(&document).await;
    review.install(generation, result);
    pb.finish_and_clear();

    if review.phase() == ReviewPhase::Failed {
        anyhow::bail!(
            "{}",
            review.error().unwrap_or("An unknown error occurred.")
        );
    }

    // Apply user corrections to the suggested accounts
    for assignment in &args.assign {
        let (pos, account) = parse_assignment(assignment)?;
        let Some(index) = review
            .invoice()
            .and_then(|inv| inv.line_items.iter().position(|item| item.pos == pos))
        else {
            anyhow::bail!("No line item with position {}", pos);
        };
        if !extractor.chart().contains(&account) {
            warn!(account = %account, "account not in the chart of accounts");
            eprintln!(
                "{} Account {} is not in the chart of accounts; assigning anyway.",
                style("⚠").yellow(),
                account
            );
        }
        review.correct_account(index, &account);
    }

    let Some(invoice) = review.invoice() else {
        anyhow::bail!("No invoice data extracted");
    };

    // Format output
    let output = format_invoice(invoice, extractor.chart(), args.format)?;

    // Write output
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

    Ok(())
}

/// Parse a `POS=ACCOUNT` assignment.
fn parse_assignment(raw: &str) -> anyhow::Result<(u32, String)> {
    let Some((pos, account)) = raw.split_once('=') else {
        anyhow::bail!("Invalid assignment '{}': expected POS=ACCOUNT", raw);
    };
    let pos: u32 = pos
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid position in assignment '{}'", raw))?;
    let account = account.trim();
    if account.is_empty() {
        anyhow::bail!("Empty account in assignment '{}'", raw);
    }
    Ok((pos, account.to_string()))
}

fn format_invoice(
    invoice: &InvoiceData,
    chart: &AccountChart,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice, chart)),
    }
}

fn format_csv(invoice: &InvoiceData) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "pos",
        "articleNumber",
        "description",
        "quantity",
        "unitPrice",
        "totalPrice",
        "taxRate",
        "suggestedAccountNumber",
    ])?;

    for item in &invoice.line_items {
        writer.write_record([
            item.pos.to_string(),
            item.article_number.clone().unwrap_or_default(),
            item.description.clone(),
            item.quantity.to_string(),
            format!("{:.2}", item.unit_price),
            format!("{:.2}", item.total_price),
            item.tax_rate.to_string(),
            item.suggested_account_number.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV output: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

fn format_text(invoice: &InvoiceData, chart: &AccountChart) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Invoice {}  ({})\n",
        style(&invoice.invoice_number).bold(),
        invoice.invoice_date
    ));
    out.push_str(&format!(
        "Net {:>10.2}   Tax {:>10.2}   Gross {:>10.2}\n\n",
        invoice.total_net, invoice.total_tax, invoice.total_gross
    ));

    out.push_str(&format!(
        "{:>4}  {:<32} {:>8} {:>10} {:>10} {:>5}  {}\n",
        "Pos", "Description", "Qty", "Unit", "Total", "S%", "Account"
    ));

    for item in &invoice.line_items {
        let account = match chart.get(&item.suggested_account_number) {
            Some(account) => format!("{} - {}", account.number, account.name),
            None if item.suggested_account_number.is_empty() => {
                style("(not selected)").dim().to_string()
            }
            // Unknown numbers render as an unselected choice but keep the
            // raw value visible for manual correction.
            None => format!(
                "{} {}",
                item.suggested_account_number,
                style("(not in chart)").yellow()
            ),
        };

        out.push_str(&format!(
            "{:>4}  {:<32} {:>8} {:>10.2} {:>10.2} {:>5}  {}\n",
            item.pos,
            item.description,
            item.quantity,
            item.unit_price,
            item.total_price,
            item.tax_rate,
            account
        ));
    }

    out
}
