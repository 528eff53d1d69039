//! Batch CLI: encounters + rate table in, monthly KPI table out.

pub mod table;

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;
use thiserror::Error;

use caseload_config::{ConfigError, ConfigManager};
use caseload_core::{EngineError, EngineReport, KpiEngine};
use caseload_ingest::{
    load_rate_book, read_encounters, write_monthly_csv, write_report_json, write_rollup_csv,
    IngestError, IngestReport,
};

use table::{Table, TableColumn, TableRenderer};

const MONTHLY_CSV: &str = "monthly_kpis.csv";
const ROLLUP_CSV: &str = "service_mix.csv";
const REPORT_JSON: &str = "report.json";

#[derive(Debug, Parser)]
#[command(
    name = "caseload",
    about = "Monthly productivity and billing KPIs from encounter records"
)]
pub struct Cli {
    /// Encounter export: encounter_date, cpt_code, duration_min,
    /// is_billable, encounter_status.
    #[arg(long)]
    pub encounters: PathBuf,

    /// Effective-dated rate table (JSON).
    #[arg(long)]
    pub rates: PathBuf,

    /// Run configuration; defaults to the user config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write monthly_kpis.csv, service_mix.csv, and report.json here.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Zero-fill months with no activity inside the observed range.
    #[arg(long)]
    pub dense: bool,
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::with_default_path(),
    };
    let config = manager.load()?;
    let mut policy = config.to_policy()?;
    if cli.dense {
        policy.aggregation.include_empty_months = true;
    }

    let rates = load_rate_book(&cli.rates)?;
    let (records, ingest_report) = read_encounters(&cli.encounters)?;

    let engine = KpiEngine::new(rates, policy);
    let report = engine.run(&records)?;

    render_monthly(&report, &config.currency);
    render_diagnostics(&ingest_report, &report);

    if let Some(out_dir) = &cli.out_dir {
        write_monthly_csv(&out_dir.join(MONTHLY_CSV), &report.monthly)?;
        write_rollup_csv(&out_dir.join(ROLLUP_CSV), &report.by_code)?;
        write_report_json(&out_dir.join(REPORT_JSON), &report)?;
        println!("Wrote {MONTHLY_CSV}, {ROLLUP_CSV}, {REPORT_JSON} to {}", out_dir.display());
    }

    Ok(())
}

fn render_monthly(report: &EngineReport, currency: &str) {
    let mut table = Table::new(
        Some("Monthly KPIs"),
        vec![
            TableColumn::new("Month", 8),
            TableColumn::new("Hours", 9),
            TableColumn::new(format!("Revenue ({currency})"), 14),
            TableColumn::new("Visits", 7),
            TableColumn::new("Units", 7),
            TableColumn::new("Rev/Hr", 9),
            TableColumn::new("Util", 7),
            TableColumn::new("ROI", 7),
        ],
    );

    for row in &report.monthly {
        table.add_row(vec![
            row.period.to_string(),
            row.client_hours.round_dp(2).normalize().to_string(),
            row.total_revenue.to_string(),
            row.encounter_count.to_string(),
            row.total_units.to_string(),
            ratio(row.revenue_per_hour, 2),
            ratio(Some(row.utilization_rate), 3),
            ratio(row.roi, 3),
        ]);
    }
    TableRenderer::render(&table);
}

fn render_diagnostics(ingest: &IngestReport, report: &EngineReport) {
    let validation = &report.diagnostics.validation;
    println!(
        "\n{} rows read ({} malformed), {} validated, {} dropped, {} unpriced",
        ingest.rows_seen,
        ingest.rejections.len(),
        validation.rows_accepted,
        validation.rows_dropped(),
        report.diagnostics.pricing_failures.len()
    );
    for failure in &report.diagnostics.pricing_failures {
        println!(
            "  unpriced: {} {} on {} ({})",
            failure.encounter_id, failure.service_code, failure.date, failure.message
        );
    }
}

fn ratio(value: Option<Decimal>, scale: u32) -> String {
    value
        .map(|ratio| ratio.round_dp(scale).normalize().to_string())
        .unwrap_or_else(|| "-".into())
}
