use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{
    leave_request::{LeaveRequest, LeaveStatus},
    ledger_transaction::LedgerTransaction,
    leave_variant::LeaveVariant,
};

/// Consumption breakdown for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Availed {
    pub approved_days: Decimal,
    /// Zero unless the variant deducts at request time.
    pub pending_days: Decimal,
    pub imported_availed: Decimal,
    /// Pending requests, counted regardless of the deduction flag.
    pub pending_count: u32,
}

impl Availed {
    pub fn total(&self) -> Decimal {
        self.approved_days + self.pending_days + self.imported_availed
    }
}

/// Sums consumption from already-attributed requests and ledger rows.
pub fn availed<'a>(
    variant: &LeaveVariant,
    requests: impl IntoIterator<Item = &'a LeaveRequest>,
    transactions: impl IntoIterator<Item = &'a LedgerTransaction>,
) -> Availed {
    let mut out = Availed::default();

    for request in requests {
        match request.status {
            LeaveStatus::Approved => out.approved_days += request.working_days,
            LeaveStatus::Pending => {
                out.pending_count += 1;
                if variant.deduct_at_request_time {
                    out.pending_days += request.working_days;
                }
            }
            LeaveStatus::Rejected => {}
        }
    }

    out.imported_availed = transactions
        .into_iter()
        .filter(|t| t.is_imported_availed())
        .map(|t| t.amount.abs())
        .sum();

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{approved, configured, ledger, pending, rejected};
    use crate::model::VariantRef;
    use crate::model::leave_variant::{AccrualMethod, GrantFrequency};
    use crate::model::ledger_transaction::{TransactionKind, TransactionSubKind};
    use rust_decimal_macros::dec;

    const R: VariantRef = VariantRef::ByVariantId(1);

    #[test]
    fn pending_ignored_without_request_time_deduction() {
        let v = configured(AccrualMethod::InAdvance, GrantFrequency::PerYear, Some(dec!(10)), false);
        let requests = vec![approved(1, R, dec!(2)), pending(2, R, dec!(3)), rejected(3, R, dec!(4))];

        let got = availed(&v, &requests, []);
        assert_eq!(got.total(), dec!(2));
        assert_eq!(got.pending_days, Decimal::ZERO);
        assert_eq!(got.pending_count, 1);
    }

    #[test]
    fn pending_counts_with_request_time_deduction() {
        let v = configured(AccrualMethod::InAdvance, GrantFrequency::PerYear, Some(dec!(10)), true);
        let requests = vec![approved(1, R, dec!(2)), pending(2, R, dec!(1.5))];

        let got = availed(&v, &requests, []);
        assert_eq!(got.total(), dec!(3.5));
        assert_eq!(got.pending_days, dec!(1.5));
    }

    #[test]
    fn imported_deductions_count_by_magnitude() {
        let v = configured(AccrualMethod::InAdvance, GrantFrequency::PerYear, Some(dec!(10)), false);
        let transactions = vec![
            ledger(1, R, TransactionKind::Deduction, TransactionSubKind::ImportedAvailed, dec!(-2), 1),
            ledger(2, R, TransactionKind::Debit, TransactionSubKind::ImportedAvailed, dec!(1.5), 2),
            // live deductions mirror approved requests and are not counted twice
            ledger(3, R, TransactionKind::Deduction, TransactionSubKind::Unclassified, dec!(-4), 3),
            ledger(4, R, TransactionKind::Grant, TransactionSubKind::ImportedAvailed, dec!(7), 4),
        ];

        let got = availed(&v, [], &transactions);
        assert_eq!(got.imported_availed, dec!(3.5));
        assert_eq!(got.total(), dec!(3.5));
    }
}
