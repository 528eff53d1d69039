use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use caseload_domain::ServiceCode;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("no billing rate for {code} on {date}")]
    RateNotFound { code: ServiceCode, date: NaiveDate },
    #[error("overlapping billing rates for {code} around {date}")]
    AmbiguousRate { code: ServiceCode, date: NaiveDate },
    #[error("invalid duration: {0} minutes")]
    InvalidDuration(Decimal),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("failure rate exceeded: {failed} of {total} rows unresolved (max {max_failure_rate})")]
    FailureRateExceeded {
        failed: usize,
        total: usize,
        max_failure_rate: f64,
    },
}
