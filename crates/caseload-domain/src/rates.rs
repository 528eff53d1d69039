//! Effective-dated billing rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{BillingMethod, ServiceCode};

/// One effective-dated billing rule for a service code.
///
/// Both interval endpoints are inclusive; a missing `effective_end` means
/// the rule is open-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRule {
    pub service_code: ServiceCode,
    pub effective_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_end: Option<NaiveDate>,
    pub billing_method: BillingMethod,
    pub rate: Decimal,
}

impl RateRule {
    pub fn new(
        service_code: ServiceCode,
        effective_start: NaiveDate,
        effective_end: Option<NaiveDate>,
        billing_method: BillingMethod,
        rate: Decimal,
    ) -> Self {
        Self {
            service_code,
            effective_start,
            effective_end,
            billing_method,
            rate,
        }
    }

    /// Whether this rule is in effect on the given date.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if date < self.effective_start {
            return false;
        }
        match self.effective_end {
            Some(end) => date <= end,
            None => true,
        }
    }

    /// Whether this rule's effective interval intersects another's.
    pub fn overlaps(&self, other: &RateRule) -> bool {
        let self_end = self.effective_end.unwrap_or(NaiveDate::MAX);
        let other_end = other.effective_end.unwrap_or(NaiveDate::MAX);
        self.effective_start <= other_end && other.effective_start <= self_end
    }
}
