//! caseload-domain
//!
//! Pure domain models (encounter records, rate rules, priced encounters,
//! monthly KPI rows). No I/O, no CLI, no storage. Only data types and core
//! enums.

pub mod common;
pub mod encounter;
pub mod kpi;
pub mod rates;

pub use common::*;
pub use encounter::*;
pub use kpi::*;
pub use rates::*;
