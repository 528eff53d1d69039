//! caseload turns encounter-level service records into validated monthly
//! productivity and financial KPIs.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("caseload tracing initialized.");
    });
}
