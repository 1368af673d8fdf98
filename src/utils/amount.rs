use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown on dashboards and reports.
pub const REPORT_DECIMAL_PLACES: u32 = 1;

/// Half-up rounding to one decimal place. Only applied at the reporting edge.
///
/// The result always carries exactly one decimal place, so `13` serializes as `"13.0"`.
pub fn round_for_report(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(REPORT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(REPORT_DECIMAL_PLACES);
    rounded
}

/// Largest magnitude, in days, a single ledger amount may carry.
pub const MAX_AMOUNT_DAYS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Parses a stored ledger amount.
///
/// Accepts plain and scientific notation, surrounding whitespace and a
/// leading `+`. Blank input reads as zero. Anything else, including amounts
/// beyond [`MAX_AMOUNT_DAYS`], is `None` and the caller decides how to degrade.
/// The bound keeps per-variant sums far away from `Decimal` overflow.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    Decimal::from_str(unsigned)
        .or_else(|_| Decimal::from_scientific(unsigned))
        .ok()
        .filter(|amount| amount.abs() <= MAX_AMOUNT_DAYS)
}
