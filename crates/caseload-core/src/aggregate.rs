//! Monthly rollups and derived KPI ratios.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use caseload_domain::{CodeMonthRollup, MonthKey, MonthlyKpi, PricedEncounter, ServiceCode};

use crate::error::EngineError;
use crate::pricing::CURRENCY_SCALE;

const MINUTES_PER_HOUR: Decimal = dec!(60);

/// Caller-supplied aggregation policy.
///
/// The baseline and goal are practice policy, not engine constants; the
/// engine never assumes a default capacity.
#[derive(Debug, Clone)]
pub struct AggregationOptions {
    /// Monthly capacity baseline for the utilization ratio (e.g. 160).
    pub baseline_hours_per_month: Decimal,
    /// Optional monthly goal line; contributes `goal_attainment` when set.
    pub utilization_goal_hours: Option<Decimal>,
    /// Monthly compensation figures for the optional ROI ratio.
    pub compensation_by_month: BTreeMap<MonthKey, Decimal>,
    /// Dense coverage: zero-filled rows for gap months inside the observed
    /// range, for downstream trend timelines.
    pub include_empty_months: bool,
}

impl AggregationOptions {
    pub fn new(baseline_hours_per_month: Decimal) -> Self {
        Self {
            baseline_hours_per_month,
            utilization_goal_hours: None,
            compensation_by_month: BTreeMap::new(),
            include_empty_months: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MonthAccum {
    minutes: Decimal,
    revenue: Decimal,
    encounters: usize,
    units: u64,
}

impl MonthAccum {
    fn absorb(&mut self, row: &PricedEncounter) {
        self.minutes += row.duration_min;
        self.revenue += row.revenue;
        self.encounters += 1;
        self.units += u64::from(row.units);
    }
}

/// Stateless grouping of priced encounters into monthly KPI rows.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Groups priced encounters by calendar month and derives the KPI
    /// ratios. Output is ordered strictly by month ascending and does not
    /// depend on input order.
    pub fn aggregate(
        rows: &[PricedEncounter],
        options: &AggregationOptions,
    ) -> Result<Vec<MonthlyKpi>, EngineError> {
        if options.baseline_hours_per_month <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "baseline_hours_per_month must be positive".into(),
            ));
        }
        if let Some(goal) = options.utilization_goal_hours {
            if goal <= Decimal::ZERO {
                return Err(EngineError::Validation(
                    "utilization_goal_hours must be positive when set".into(),
                ));
            }
        }

        let mut by_month: BTreeMap<MonthKey, MonthAccum> = BTreeMap::new();
        for row in rows {
            by_month.entry(row.month()).or_default().absorb(row);
        }

        if options.include_empty_months {
            let bounds = by_month
                .keys()
                .next()
                .copied()
                .zip(by_month.keys().next_back().copied());
            if let Some((first, last)) = bounds {
                let mut month = first;
                while month < last {
                    by_month.entry(month).or_default();
                    month = month.next();
                }
            }
        }

        Ok(by_month
            .into_iter()
            .map(|(month, accum)| Self::kpi_row(month, &accum, options))
            .collect())
    }

    /// Service-mix rollup: one row per (month, code), ordered by month then
    /// code.
    pub fn rollup_by_code(rows: &[PricedEncounter]) -> Vec<CodeMonthRollup> {
        let mut grouped: BTreeMap<(MonthKey, ServiceCode), MonthAccum> = BTreeMap::new();
        for row in rows {
            grouped
                .entry((row.month(), row.service_code.clone()))
                .or_default()
                .absorb(row);
        }
        grouped
            .into_iter()
            .map(|((period, service_code), accum)| CodeMonthRollup {
                period,
                service_code,
                encounter_count: accum.encounters,
                total_units: accum.units,
                revenue: accum.revenue.round_dp(CURRENCY_SCALE),
            })
            .collect()
    }

    fn kpi_row(month: MonthKey, accum: &MonthAccum, options: &AggregationOptions) -> MonthlyKpi {
        let client_hours = accum.minutes / MINUTES_PER_HOUR;
        let total_revenue = accum.revenue.round_dp(CURRENCY_SCALE);

        // Undefined ratios stay None; a zero here would masquerade as a
        // true rate.
        let revenue_per_hour = if client_hours > Decimal::ZERO {
            Some(total_revenue / client_hours)
        } else {
            None
        };
        let utilization_rate = client_hours / options.baseline_hours_per_month;
        let goal_attainment = options
            .utilization_goal_hours
            .map(|goal| client_hours / goal);
        let roi = options
            .compensation_by_month
            .get(&month)
            .filter(|compensation| **compensation > Decimal::ZERO)
            .map(|compensation| total_revenue / *compensation);

        MonthlyKpi {
            period: month,
            client_hours,
            total_revenue,
            encounter_count: accum.encounters,
            total_units: accum.units,
            revenue_per_hour,
            utilization_rate,
            goal_attainment,
            roi,
        }
    }
}
