//! KPI export to CSV and JSON.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;

use caseload_core::EngineReport;
use caseload_domain::{CodeMonthRollup, MonthlyKpi};

use crate::error::IngestError;

const TMP_SUFFIX: &str = "tmp";
const RATIO_SCALE: u32 = 4;

/// Writes the monthly KPI rows as CSV.
pub fn write_monthly_csv(path: &Path, rows: &[MonthlyKpi]) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "month",
        "client_hours",
        "total_revenue",
        "encounters",
        "total_units",
        "revenue_per_hour",
        "utilization_rate",
        "goal_attainment",
        "roi",
    ])?;
    for row in rows {
        writer.write_record([
            row.period.to_string(),
            ratio_cell(Some(row.client_hours)),
            row.total_revenue.to_string(),
            row.encounter_count.to_string(),
            row.total_units.to_string(),
            ratio_cell(row.revenue_per_hour),
            ratio_cell(Some(row.utilization_rate)),
            ratio_cell(row.goal_attainment),
            ratio_cell(row.roi),
        ])?;
    }
    write_atomic_bytes(path, &finish(writer)?)
}

/// Writes the per-code service-mix rollup as CSV.
pub fn write_rollup_csv(path: &Path, rows: &[CodeMonthRollup]) -> Result<(), IngestError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["month", "cpt_code", "encounters", "total_units", "revenue"])?;
    for row in rows {
        writer.write_record([
            row.period.to_string(),
            row.service_code.as_str().to_string(),
            row.encounter_count.to_string(),
            row.total_units.to_string(),
            row.revenue.to_string(),
        ])?;
    }
    write_atomic_bytes(path, &finish(writer)?)
}

/// Writes the full engine report (KPI rows + diagnostics) as pretty JSON.
pub fn write_report_json(path: &Path, report: &EngineReport) -> Result<(), IngestError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| IngestError::Serde(err.to_string()))?;
    write_atomic_bytes(path, json.as_bytes())
}

/// Undefined ratios export as empty cells, not zeros.
fn ratio_cell(value: Option<Decimal>) -> String {
    value
        .map(|ratio| ratio.round_dp(RATIO_SCALE).normalize().to_string())
        .unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, IngestError> {
    writer
        .into_inner()
        .map_err(|err| IngestError::Serde(err.to_string()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic_bytes(path: &Path, data: &[u8]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
