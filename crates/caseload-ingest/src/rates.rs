//! Rate-table loading.

use std::fs;
use std::path::Path;

use caseload_core::RateBook;
use caseload_domain::RateRule;

use crate::error::IngestError;

/// Loads effective-dated rate rules from a JSON document.
pub fn load_rate_rules(path: &Path) -> Result<Vec<RateRule>, IngestError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| IngestError::Serde(err.to_string()))
}

/// Loads and validates the rate table in one step; overlapping rules are a
/// load-time failure.
pub fn load_rate_book(path: &Path) -> Result<RateBook, IngestError> {
    let rules = load_rate_rules(path)?;
    RateBook::new(rules).map_err(|err| IngestError::RateTable(err.to_string()))
}
