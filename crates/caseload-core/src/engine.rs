//! Pipeline facade: records in, monthly KPI table out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use caseload_domain::{CodeMonthRollup, EncounterRecord, MonthlyKpi, ServiceCode, ValidatedEncounter};

use crate::aggregate::{AggregationOptions, MonthlyAggregator};
use crate::error::EngineError;
use crate::pricing::price;
use crate::rates::RateBook;
use crate::units::billable_units;
use crate::validator::{RecordValidator, ValidationReport};

/// Run-level policy wrapped around the aggregation options.
#[derive(Debug, Clone)]
pub struct RunPolicy {
    /// Abort the run when (data failures + pricing failures) / rows seen
    /// exceeds this fraction. 1.0 collects diagnostics without aborting.
    pub max_failure_rate: f64,
    pub aggregation: AggregationOptions,
}

impl RunPolicy {
    pub fn new(aggregation: AggregationOptions) -> Self {
        Self {
            max_failure_rate: 1.0,
            aggregation,
        }
    }

    pub fn with_max_failure_rate(mut self, max_failure_rate: f64) -> Self {
        self.max_failure_rate = max_failure_rate;
        self
    }
}

/// One encounter whose pricing failed; the row is excluded from the KPI
/// totals and surfaced here instead of being silently zeroed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingFailure {
    pub encounter_id: Uuid,
    pub service_code: ServiceCode,
    pub date: NaiveDate,
    pub message: String,
}

/// Row-level diagnostics for a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub validation: ValidationReport,
    pub pricing_failures: Vec<PricingFailure>,
}

impl Diagnostics {
    /// Rows that failed rather than being filtered on purpose.
    pub fn failed_rows(&self) -> usize {
        self.validation.data_failures() + self.pricing_failures.len()
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineReport {
    pub monthly: Vec<MonthlyKpi>,
    pub by_code: Vec<CodeMonthRollup>,
    pub diagnostics: Diagnostics,
}

/// Orchestrates validation, pricing, and aggregation over one batch.
///
/// The rate book is read-only shared state; independent engines can carry
/// independent schedules (e.g. backtesting) without interference.
pub struct KpiEngine {
    rates: RateBook,
    policy: RunPolicy,
}

impl KpiEngine {
    pub fn new(rates: RateBook, policy: RunPolicy) -> Self {
        Self { rates, policy }
    }

    pub fn rates(&self) -> &RateBook {
        &self.rates
    }

    /// Runs the full pipeline over one batch of raw records.
    pub fn run(&self, records: &[EncounterRecord]) -> Result<EngineReport, EngineError> {
        let (validated, validation) = RecordValidator::validate(records);

        let mut priced = Vec::with_capacity(validated.len());
        let mut pricing_failures = Vec::new();
        for encounter in &validated {
            match self.price_one(encounter) {
                Ok(row) => priced.push(row),
                Err(error) => {
                    tracing::warn!(
                        encounter = %encounter.id,
                        code = %encounter.service_code,
                        date = %encounter.date,
                        %error,
                        "encounter could not be priced"
                    );
                    pricing_failures.push(PricingFailure {
                        encounter_id: encounter.id,
                        service_code: encounter.service_code.clone(),
                        date: encounter.date,
                        message: error.to_string(),
                    });
                }
            }
        }

        let diagnostics = Diagnostics {
            validation,
            pricing_failures,
        };
        self.enforce_failure_policy(&diagnostics)?;

        let monthly = MonthlyAggregator::aggregate(&priced, &self.policy.aggregation)?;
        let by_code = MonthlyAggregator::rollup_by_code(&priced);
        Ok(EngineReport {
            monthly,
            by_code,
            diagnostics,
        })
    }

    fn price_one(
        &self,
        encounter: &ValidatedEncounter,
    ) -> Result<caseload_domain::PricedEncounter, EngineError> {
        let rule = self.rates.resolve(&encounter.service_code, encounter.date)?;
        let units = billable_units(encounter.duration_min, rule.billing_method)?;
        Ok(price(encounter, rule, units))
    }

    fn enforce_failure_policy(&self, diagnostics: &Diagnostics) -> Result<(), EngineError> {
        let total = diagnostics.validation.rows_seen;
        let failed = diagnostics.failed_rows();
        if total == 0 || failed == 0 {
            return Ok(());
        }
        let rate = failed as f64 / total as f64;
        if rate > self.policy.max_failure_rate {
            return Err(EngineError::FailureRateExceeded {
                failed,
                total,
                max_failure_rate: self.policy.max_failure_rate,
            });
        }
        Ok(())
    }
}
