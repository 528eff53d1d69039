//! Domain models for encounter rows at each pipeline stage.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// One raw service record as supplied by ingestion.
///
/// Immutable after creation; the validator decides whether it enters the
/// billing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub service_code: ServiceCode,
    /// Missing durations are allowed here; the validator rejects them.
    pub duration_min: Option<Decimal>,
    pub is_billable: bool,
    pub status: EncounterStatus,
}

impl EncounterRecord {
    pub fn new(
        date: NaiveDate,
        service_code: ServiceCode,
        duration_min: Option<Decimal>,
        is_billable: bool,
        status: EncounterStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            service_code,
            duration_min,
            is_billable,
            status,
        }
    }
}

impl Identifiable for EncounterRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// An encounter that passed validation: billable, completed, and carrying a
/// non-negative duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedEncounter {
    pub id: Uuid,
    pub date: NaiveDate,
    pub service_code: ServiceCode,
    pub duration_min: Decimal,
}

impl ValidatedEncounter {
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

impl Identifiable for ValidatedEncounter {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A validated encounter annotated with its resolved billing method,
/// billable quantity, and revenue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedEncounter {
    pub id: Uuid,
    pub date: NaiveDate,
    pub service_code: ServiceCode,
    pub duration_min: Decimal,
    pub billing_method: BillingMethod,
    pub units: u32,
    pub rate: Decimal,
    pub revenue: Decimal,
}

impl PricedEncounter {
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

impl Identifiable for PricedEncounter {
    fn id(&self) -> Uuid {
        self.id
    }
}
