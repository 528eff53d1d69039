//! Monthly KPI output rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{MonthKey, ServiceCode};

/// One row of the monthly KPI table.
///
/// Ratios that would divide by zero are `None`, never zero, so downstream
/// consumers can tell "no hours delivered" apart from "earned nothing per
/// hour".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyKpi {
    pub period: MonthKey,
    pub client_hours: Decimal,
    pub total_revenue: Decimal,
    pub encounter_count: usize,
    pub total_units: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_per_hour: Option<Decimal>,
    pub utilization_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_attainment: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<Decimal>,
}

impl MonthlyKpi {
    /// A zero-activity row for dense month coverage.
    pub fn empty(period: MonthKey) -> Self {
        Self {
            period,
            client_hours: Decimal::ZERO,
            total_revenue: Decimal::ZERO,
            encounter_count: 0,
            total_units: 0,
            revenue_per_hour: None,
            utilization_rate: Decimal::ZERO,
            goal_attainment: None,
            roi: None,
        }
    }
}

/// Service-mix rollup: one row per (month, service code).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeMonthRollup {
    pub period: MonthKey,
    pub service_code: ServiceCode,
    pub encounter_count: usize,
    pub total_units: u64,
    pub revenue: Decimal,
}
