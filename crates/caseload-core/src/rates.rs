//! Interval-indexed lookup of effective-dated billing rates.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use caseload_domain::{RateRule, ServiceCode};

use crate::error::EngineError;

/// The validated fiscal rate table for a run.
///
/// Rules are indexed per service code by `effective_start`; overlap
/// validation happens once here, so `resolve` can return at most one rule.
/// The book is read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct RateBook {
    rules: HashMap<ServiceCode, BTreeMap<NaiveDate, RateRule>>,
}

impl RateBook {
    /// Builds the book, rejecting overlapping effective ranges per code.
    pub fn new(rules: Vec<RateRule>) -> Result<Self, EngineError> {
        let mut indexed: HashMap<ServiceCode, BTreeMap<NaiveDate, RateRule>> = HashMap::new();
        for rule in rules {
            let series = indexed.entry(rule.service_code.clone()).or_default();
            if series.contains_key(&rule.effective_start) {
                return Err(EngineError::AmbiguousRate {
                    code: rule.service_code.clone(),
                    date: rule.effective_start,
                });
            }
            series.insert(rule.effective_start, rule);
        }

        for series in indexed.values() {
            let mut previous: Option<&RateRule> = None;
            for rule in series.values() {
                if let Some(earlier) = previous {
                    if earlier.overlaps(rule) {
                        return Err(EngineError::AmbiguousRate {
                            code: rule.service_code.clone(),
                            date: rule.effective_start,
                        });
                    }
                }
                previous = Some(rule);
            }
        }

        Ok(Self { rules: indexed })
    }

    /// Looks up the rule in effect for `code` on `date`.
    pub fn resolve(&self, code: &ServiceCode, date: NaiveDate) -> Result<&RateRule, EngineError> {
        let not_found = || EngineError::RateNotFound {
            code: code.clone(),
            date,
        };
        let series = self.rules.get(code).ok_or_else(not_found)?;
        let (_, candidate) = series.range(..=date).next_back().ok_or_else(not_found)?;
        if candidate.applies_on(date) {
            Ok(candidate)
        } else {
            Err(not_found())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of rules across all codes.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(|series| series.len()).sum()
    }

    /// Service codes the book knows about, sorted.
    pub fn codes(&self) -> Vec<&ServiceCode> {
        let mut codes: Vec<_> = self.rules.keys().collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseload_domain::BillingMethod;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(code: &str, start: NaiveDate, end: Option<NaiveDate>, rate: Decimal) -> RateRule {
        RateRule::new(
            ServiceCode::new(code),
            start,
            end,
            BillingMethod::TimeBased,
            rate,
        )
    }

    #[test]
    fn resolves_the_rule_containing_the_date() {
        let book = RateBook::new(vec![
            rule("H0004", date(2023, 1, 1), Some(date(2023, 12, 31)), dec!(26.50)),
            rule("H0004", date(2024, 1, 1), None, dec!(29.50)),
        ])
        .expect("disjoint rules load");

        let fy23 = book
            .resolve(&ServiceCode::new("H0004"), date(2023, 6, 15))
            .expect("fy23 rule");
        assert_eq!(fy23.rate, dec!(26.50));

        let fy24 = book
            .resolve(&ServiceCode::new("H0004"), date(2025, 2, 1))
            .expect("open-ended rule");
        assert_eq!(fy24.rate, dec!(29.50));
    }

    #[test]
    fn boundary_date_resolves_to_the_ending_rule() {
        let book = RateBook::new(vec![
            rule("H0038", date(2023, 1, 1), Some(date(2023, 12, 31)), dec!(24.00)),
            rule("H0038", date(2024, 1, 1), Some(date(2024, 12, 31)), dec!(26.50)),
        ])
        .expect("disjoint rules load");

        let on_end = book
            .resolve(&ServiceCode::new("H0038"), date(2023, 12, 31))
            .expect("inclusive end");
        assert_eq!(on_end.rate, dec!(24.00));

        let next_day = book
            .resolve(&ServiceCode::new("H0038"), date(2024, 1, 1))
            .expect("next rule starts");
        assert_eq!(next_day.rate, dec!(26.50));
    }

    #[test]
    fn unknown_code_and_uncovered_date_fail() {
        let book = RateBook::new(vec![rule(
            "90834",
            date(2023, 1, 1),
            Some(date(2023, 12, 31)),
            dec!(100.00),
        )])
        .expect("loads");

        assert!(matches!(
            book.resolve(&ServiceCode::new("XXXX"), date(2023, 6, 1)),
            Err(EngineError::RateNotFound { .. })
        ));
        assert!(matches!(
            book.resolve(&ServiceCode::new("90834"), date(2024, 6, 1)),
            Err(EngineError::RateNotFound { .. })
        ));
        assert!(matches!(
            book.resolve(&ServiceCode::new("90834"), date(2022, 6, 1)),
            Err(EngineError::RateNotFound { .. })
        ));
    }

    #[test]
    fn overlapping_rules_are_rejected_at_load() {
        let overlapping = RateBook::new(vec![
            rule("T1012", date(2023, 1, 1), Some(date(2023, 12, 31)), dec!(47.50)),
            rule("T1012", date(2023, 12, 31), None, dec!(52.50)),
        ]);
        assert!(matches!(
            overlapping,
            Err(EngineError::AmbiguousRate { .. })
        ));

        let touching = RateBook::new(vec![
            rule("T1012", date(2023, 1, 1), Some(date(2023, 6, 30)), dec!(47.50)),
            rule("T1012", date(2023, 7, 1), None, dec!(52.50)),
        ]);
        assert!(touching.is_ok());
    }
}
