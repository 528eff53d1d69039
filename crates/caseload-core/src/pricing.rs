//! Per-encounter revenue computation.

use rust_decimal::Decimal;

use caseload_domain::{PricedEncounter, RateRule, ValidatedEncounter};

/// Currency amounts carry two fractional digits.
pub const CURRENCY_SCALE: u32 = 2;

/// Combines a validated encounter, its resolved rate rule, and its billable
/// quantity into a priced row. `revenue = units × rate`, at currency scale.
pub fn price(encounter: &ValidatedEncounter, rule: &RateRule, units: u32) -> PricedEncounter {
    let revenue = (Decimal::from(units) * rule.rate).round_dp(CURRENCY_SCALE);
    PricedEncounter {
        id: encounter.id,
        date: encounter.date,
        service_code: encounter.service_code.clone(),
        duration_min: encounter.duration_min,
        billing_method: rule.billing_method,
        units,
        rate: rule.rate,
        revenue,
    }
}
