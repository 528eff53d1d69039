//! caseload-core
//!
//! Billing and KPI aggregation engine. Depends on caseload-domain.
//! No CLI, no terminal I/O, no file access.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod pricing;
pub mod rates;
pub mod units;
pub mod validator;

pub use aggregate::*;
pub use engine::*;
pub use error::EngineError;
pub use pricing::*;
pub use rates::RateBook;
pub use units::*;
pub use validator::*;
