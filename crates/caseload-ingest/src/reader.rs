//! CSV encounter ingestion with per-row coercion diagnostics.

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use caseload_domain::{EncounterRecord, EncounterStatus, ServiceCode};

use crate::error::IngestError;

const DATE_COLUMN: &str = "encounter_date";
const CODE_COLUMN: &str = "cpt_code";
const DURATION_COLUMN: &str = "duration_min";
const BILLABLE_COLUMN: &str = "is_billable";
const STATUS_COLUMN: &str = "encounter_status";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One source row that could not be coerced into an [`EncounterRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRejection {
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    pub field: String,
    pub message: String,
}

/// Diagnostics for one ingestion pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub rows_seen: usize,
    pub rows_loaded: usize,
    pub rejections: Vec<IngestRejection>,
}

struct Columns {
    date: usize,
    code: usize,
    duration: usize,
    billable: usize,
    status: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find(DATE_COLUMN)?,
            code: find(CODE_COLUMN)?,
            duration: find(DURATION_COLUMN)?,
            billable: find(BILLABLE_COLUMN)?,
            status: find(STATUS_COLUMN)?,
        })
    }
}

/// Reads an encounter CSV, coercing raw fields into typed records.
///
/// Rows with unusable dates, codes, or flags are excluded and recorded —
/// never silently dropped. Blank durations load as `None` so the validator
/// can account for them.
pub fn read_encounters(path: &Path) -> Result<(Vec<EncounterRecord>, IngestReport), IngestError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let columns = Columns::locate(reader.headers()?)?;

    let mut records = Vec::new();
    let mut report = IngestReport::default();

    for (index, row) in reader.records().enumerate() {
        let line = index as u64 + 2;
        report.rows_seen += 1;
        let row = row?;
        match coerce_row(&row, &columns) {
            Ok(record) => records.push(record),
            Err((field, message)) => {
                report.rejections.push(IngestRejection {
                    line,
                    field,
                    message,
                });
            }
        }
    }

    report.rows_loaded = records.len();
    if !report.rejections.is_empty() {
        tracing::warn!(
            rejected = report.rejections.len(),
            seen = report.rows_seen,
            "ingestion excluded malformed rows"
        );
    }
    Ok((records, report))
}

fn coerce_row(
    row: &StringRecord,
    columns: &Columns,
) -> Result<EncounterRecord, (String, String)> {
    let cell = |index: usize| row.get(index).unwrap_or("");

    let date = NaiveDate::parse_from_str(cell(columns.date), DATE_FORMAT)
        .map_err(|err| (DATE_COLUMN.to_string(), err.to_string()))?;

    let code = cell(columns.code);
    if code.is_empty() {
        return Err((CODE_COLUMN.to_string(), "empty service code".into()));
    }

    let duration = match cell(columns.duration) {
        "" => None,
        raw => Some(
            Decimal::from_str(raw)
                .map_err(|err| (DURATION_COLUMN.to_string(), err.to_string()))?,
        ),
    };

    let is_billable = parse_flag(cell(columns.billable))
        .ok_or_else(|| (BILLABLE_COLUMN.to_string(), "expected a boolean flag".into()))?;

    let status = EncounterStatus::from_label(cell(columns.status));

    Ok(EncounterRecord::new(
        date,
        ServiceCode::new(code),
        duration,
        is_billable,
        status,
    ))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_coerce_from_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
