use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::model::leave_variant::{AccrualMethod, GrantFrequency, LeaveVariant};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Days the employee is entitled to on `as_of`, before any consumption.
///
/// `total_entitlement_override` replaces the variant's annual allocation
/// when present. The result is exact; rounding belongs to reporting.
pub fn eligibility(
    variant: &LeaveVariant,
    as_of: NaiveDate,
    total_entitlement_override: Option<Decimal>,
) -> Decimal {
    let annual = match total_entitlement_override.or(variant.annual_allocation_days) {
        Some(days) if days > Decimal::ZERO => days,
        _ => return Decimal::ZERO,
    };

    let month = as_of.month();
    match (variant.accrual_method, variant.grant_frequency) {
        // The current, partial month has not been earned yet.
        (AccrualMethod::AfterEarning, _) => prorate(annual, month - 1),
        (AccrualMethod::InAdvance, GrantFrequency::PerYear) => annual,
        (AccrualMethod::InAdvance, GrantFrequency::Monthly) => prorate(annual, month),
    }
}

fn prorate(annual: Decimal, months: u32) -> Decimal {
    annual * Decimal::from(months) / MONTHS_PER_YEAR
}
