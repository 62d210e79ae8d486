//! Report rendering for analyzed bills.

use std::fmt::Write as _;

use chrono::Local;
use rust_decimal::Decimal;

use medbill_core::BillAnalysis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text report
    Text,
}

impl OutputFormat {
    /// File extension used when writing reports to a directory.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Column names shared by the CSV report and the batch summary.
pub const SUMMARY_COLUMNS: [&str; 9] = [
    "patient_name",
    "hospital_name",
    "date",
    "total_amount",
    "tax_amount",
    "line_items",
    "fraud_score",
    "risk",
    "errors",
];

pub fn render(analysis: &BillAnalysis, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(analysis)?),
        OutputFormat::Csv => render_csv(analysis),
        OutputFormat::Text => Ok(render_text(analysis)),
    }
}

/// One summary row, in [`SUMMARY_COLUMNS`] order.
pub fn summary_row(analysis: &BillAnalysis) -> Vec<String> {
    let record = &analysis.record;

    vec![
        record.patient_display().to_string(),
        record.hospital_display().to_string(),
        record.date_display().to_string(),
        money(record.total_amount),
        money(record.tax_amount),
        record.line_items.len().to_string(),
        analysis.validation.fraud_score.to_string(),
        analysis.risk.label().to_string(),
        analysis.validation.errors.join("; "),
    ]
}

fn render_csv(analysis: &BillAnalysis) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(SUMMARY_COLUMNS)?;
    wtr.write_record(summary_row(analysis))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn render_text(analysis: &BillAnalysis) -> String {
    let record = &analysis.record;
    let validation = &analysis.validation;
    let mut output = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(output, "Digitized Hospital Bill Report");
    let _ = writeln!(output, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M"));
    output.push('\n');

    let _ = writeln!(output, "Patient Name:  {}", record.patient_display());
    let _ = writeln!(output, "Hospital Name: {}", record.hospital_display());
    let _ = writeln!(output, "Bill Date:     {}", record.date_display());
    if let Some(subtotal) = record.subtotal {
        let _ = writeln!(output, "Subtotal:      {}", money(subtotal));
    }
    let _ = writeln!(output, "GST Amount:    {}", money(record.tax_amount));
    let _ = writeln!(output, "Total Amount:  {}", money(record.total_amount));
    output.push('\n');

    output.push_str("Line Items:\n");
    if record.line_items.is_empty() {
        output.push_str("  (none detected)\n");
    }
    for (i, item) in record.line_items.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {}. {} x{} @ {} = {}",
            i + 1,
            item.item_name,
            item.quantity,
            money(item.unit_price),
            money(item.line_total)
        );
    }
    output.push('\n');

    output.push_str("Validation:\n");
    if validation.errors.is_empty() {
        output.push_str("  No issues found\n");
    }
    for error in &validation.errors {
        let _ = writeln!(output, "  - {}", error);
    }
    let _ = writeln!(output, "Fraud Score: {}/100", validation.fraud_score);
    let _ = writeln!(output, "Risk Level:  {}", analysis.risk);
    output.push('\n');

    output.push_str("Complete Extracted Bill Content\n");
    output.push_str("-------------------------------\n");
    for line in &analysis.lines {
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
    output.push_str("End of Report\n");

    output
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
