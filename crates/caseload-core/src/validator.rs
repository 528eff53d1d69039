//! Cleans and filters raw encounter records before pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caseload_domain::{EncounterRecord, ValidatedEncounter};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Why a raw record was excluded from the billing pipeline.
pub enum DropReason {
    /// Expected filtering, not a data problem.
    NotBillable,
    NotCompleted,
    /// Data failures; these count toward the run's failure rate.
    MissingDuration,
    NegativeDuration,
}

impl DropReason {
    /// Filtering drops are expected; data failures indicate bad rows.
    pub fn is_data_failure(self) -> bool {
        matches!(self, DropReason::MissingDuration | DropReason::NegativeDuration)
    }
}

/// One excluded row and the reason it was excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRejection {
    pub encounter_id: Uuid,
    pub reason: DropReason,
}

/// Diagnostics produced alongside the validated output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows_seen: usize,
    pub rows_accepted: usize,
    pub rejections: Vec<RowRejection>,
}

impl ValidationReport {
    pub fn rows_dropped(&self) -> usize {
        self.rejections.len()
    }

    pub fn count(&self, reason: DropReason) -> usize {
        self.rejections
            .iter()
            .filter(|rejection| rejection.reason == reason)
            .count()
    }

    /// Rows dropped for data problems rather than expected filtering.
    pub fn data_failures(&self) -> usize {
        self.rejections
            .iter()
            .filter(|rejection| rejection.reason.is_data_failure())
            .count()
    }
}

/// Stateless validation over raw encounter records.
pub struct RecordValidator;

impl RecordValidator {
    /// Filters the raw records down to billable, completed encounters with
    /// usable durations. Excluded rows are recorded, never silently lost.
    pub fn validate(records: &[EncounterRecord]) -> (Vec<ValidatedEncounter>, ValidationReport) {
        let mut accepted = Vec::with_capacity(records.len());
        let mut report = ValidationReport {
            rows_seen: records.len(),
            ..ValidationReport::default()
        };

        for record in records {
            if let Some(reason) = Self::rejection_for(record) {
                report.rejections.push(RowRejection {
                    encounter_id: record.id,
                    reason,
                });
                continue;
            }
            let duration = record
                .duration_min
                .expect("rejection_for screens missing durations");
            accepted.push(ValidatedEncounter {
                id: record.id,
                date: record.date,
                service_code: record.service_code.clone(),
                duration_min: duration,
            });
        }

        report.rows_accepted = accepted.len();
        if report.rows_dropped() > 0 {
            tracing::debug!(
                seen = report.rows_seen,
                accepted = report.rows_accepted,
                dropped = report.rows_dropped(),
                "validation excluded rows"
            );
        }
        (accepted, report)
    }

    fn rejection_for(record: &EncounterRecord) -> Option<DropReason> {
        if !record.is_billable {
            return Some(DropReason::NotBillable);
        }
        if !record.status.is_completed() {
            return Some(DropReason::NotCompleted);
        }
        match record.duration_min {
            None => Some(DropReason::MissingDuration),
            Some(duration) if duration < Decimal::ZERO => Some(DropReason::NegativeDuration),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseload_domain::{EncounterStatus, ServiceCode};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(
        billable: bool,
        status: EncounterStatus,
        duration: Option<Decimal>,
    ) -> EncounterRecord {
        EncounterRecord::new(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            ServiceCode::new("T1015"),
            duration,
            billable,
            status,
        )
    }

    #[test]
    fn keeps_only_billable_completed_rows() {
        let records = vec![
            record(true, EncounterStatus::Completed, Some(dec!(60))),
            record(false, EncounterStatus::Completed, Some(dec!(60))),
            record(true, EncounterStatus::Cancelled, Some(dec!(60))),
            record(true, EncounterStatus::NoShow, Some(dec!(60))),
        ];
        let (accepted, report) = RecordValidator::validate(&records);
        assert_eq!(accepted.len(), 1);
        assert_eq!(report.rows_seen, 4);
        assert_eq!(report.count(DropReason::NotBillable), 1);
        assert_eq!(report.count(DropReason::NotCompleted), 2);
        assert_eq!(report.data_failures(), 0);
    }

    #[test]
    fn bad_durations_are_recorded_data_failures() {
        let records = vec![
            record(true, EncounterStatus::Completed, None),
            record(true, EncounterStatus::Completed, Some(dec!(-10))),
            record(true, EncounterStatus::Completed, Some(dec!(0))),
        ];
        let (accepted, report) = RecordValidator::validate(&records);
        // Zero duration is valid; it yields zero units but counts as a visit.
        assert_eq!(accepted.len(), 1);
        assert_eq!(report.data_failures(), 2);
        assert_eq!(report.count(DropReason::MissingDuration), 1);
        assert_eq!(report.count(DropReason::NegativeDuration), 1);
    }
}
