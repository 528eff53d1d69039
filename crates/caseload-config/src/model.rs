use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use caseload_core::{AggregationOptions, RunPolicy};
use caseload_domain::MonthKey;

use crate::error::ConfigError;

/// User-configurable run policy for the KPI pipeline.
///
/// Everything here is practice policy the engine refuses to hardcode: the
/// capacity baseline, the goal line, compensation figures, and how tolerant
/// a run is of unresolved rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "RunConfig::default_baseline_hours")]
    pub baseline_hours_per_month: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization_goal_hours: Option<Decimal>,
    /// Fraction of rows allowed to fail before the run aborts; 1.0 never
    /// aborts.
    #[serde(default = "RunConfig::default_max_failure_rate")]
    pub max_failure_rate: f64,
    #[serde(default)]
    pub include_empty_months: bool,
    /// Monthly compensation keyed by "YYYY-MM".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compensation_by_month: BTreeMap<String, Decimal>,
    #[serde(default = "RunConfig::default_currency")]
    pub currency: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            baseline_hours_per_month: Self::default_baseline_hours(),
            utilization_goal_hours: None,
            max_failure_rate: Self::default_max_failure_rate(),
            include_empty_months: false,
            compensation_by_month: BTreeMap::new(),
            currency: Self::default_currency(),
        }
    }
}

impl RunConfig {
    pub fn default_baseline_hours() -> Decimal {
        dec!(160)
    }

    pub fn default_max_failure_rate() -> f64 {
        1.0
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    /// Maps the config onto the core's run policy, parsing month keys.
    pub fn to_policy(&self) -> Result<RunPolicy, ConfigError> {
        if !(0.0..=1.0).contains(&self.max_failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "max_failure_rate {} outside 0.0..=1.0",
                self.max_failure_rate
            )));
        }

        let mut compensation = BTreeMap::new();
        for (raw, amount) in &self.compensation_by_month {
            let key: MonthKey = raw
                .parse()
                .map_err(|err| ConfigError::Invalid(format!("compensation_by_month: {err}")))?;
            compensation.insert(key, *amount);
        }

        let mut aggregation = AggregationOptions::new(self.baseline_hours_per_month);
        aggregation.utilization_goal_hours = self.utilization_goal_hours;
        aggregation.compensation_by_month = compensation;
        aggregation.include_empty_months = self.include_empty_months;

        Ok(RunPolicy::new(aggregation).with_max_failure_rate(self.max_failure_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_maps_to_a_tolerant_policy() {
        let policy = RunConfig::default().to_policy().expect("valid defaults");
        assert_eq!(policy.max_failure_rate, 1.0);
        assert_eq!(policy.aggregation.baseline_hours_per_month, dec!(160));
        assert!(policy.aggregation.compensation_by_month.is_empty());
    }

    #[test]
    fn compensation_month_keys_are_parsed() {
        let mut config = RunConfig::default();
        config
            .compensation_by_month
            .insert("2023-06".into(), dec!(4000));
        let policy = config.to_policy().expect("valid month key");
        assert_eq!(
            policy
                .aggregation
                .compensation_by_month
                .get(&MonthKey::new(2023, 6)),
            Some(&dec!(4000))
        );

        config
            .compensation_by_month
            .insert("not-a-month".into(), dec!(1));
        assert!(config.to_policy().is_err());
    }

    #[test]
    fn out_of_range_failure_rate_is_rejected() {
        let mut config = RunConfig::default();
        config.max_failure_rate = 1.5;
        assert!(matches!(config.to_policy(), Err(ConfigError::Invalid(_))));
    }
}
