//! Shared identifiers, enums, and the month grouping key.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for rows flowing through the pipeline.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Billing/procedure code identifying the service rendered (CPT/HCPCS style).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceCode(pub String);

impl ServiceCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Enumerates how a service code is billed.
pub enum BillingMethod {
    /// Billed in 15-minute increments of the recorded duration.
    TimeBased,
    /// Billed as a flat rate per encounter regardless of duration.
    PerEncounter,
}

impl fmt::Display for BillingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillingMethod::TimeBased => "time_based",
            BillingMethod::PerEncounter => "per_encounter",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Enumerates the recorded outcome of an encounter.
pub enum EncounterStatus {
    Completed,
    Cancelled,
    NoShow,
    /// Any status label outside the recognized set, kept verbatim.
    Other(String),
}

impl EncounterStatus {
    /// Maps a raw status label onto the recognized set.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "completed" | "complete" => EncounterStatus::Completed,
            "cancelled" | "canceled" => EncounterStatus::Cancelled,
            "no-show" | "no_show" | "noshow" => EncounterStatus::NoShow,
            _ => EncounterStatus::Other(label.trim().to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, EncounterStatus::Completed)
    }
}

impl fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterStatus::Completed => f.write_str("completed"),
            EncounterStatus::Cancelled => f.write_str("cancelled"),
            EncounterStatus::NoShow => f.write_str("no-show"),
            EncounterStatus::Other(label) => write!(f, "other({label})"),
        }
    }
}

/// Calendar-month grouping key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month, useful for date arithmetic.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month key holds a valid year-month")
    }

    /// The following calendar month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthKeyError(pub String);

impl fmt::Display for ParseMonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month key `{}` (expected YYYY-MM)", self.0)
    }
}

impl std::error::Error for ParseMonthKeyError {}

impl FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.trim().splitn(2, '-');
        let year = parts
            .next()
            .and_then(|part| part.parse::<i32>().ok())
            .ok_or_else(|| ParseMonthKeyError(value.to_string()))?;
        let month = parts
            .next()
            .and_then(|part| part.parse::<u32>().ok())
            .filter(|month| (1..=12).contains(month))
            .ok_or_else(|| ParseMonthKeyError(value.to_string()))?;
        Ok(Self { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
