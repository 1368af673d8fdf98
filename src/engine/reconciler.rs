use rust_decimal::Decimal;

use super::availed::Availed;
use super::{EligibilitySource, VariantBalance};
use crate::model::{ledger_transaction::LedgerTransaction, leave_variant::LeaveVariant};

/// The carried-forward balance for a variant.
///
/// Only the most recent import counts: a later import supersedes earlier
/// ones and they are never summed. Equal timestamps resolve to the row that
/// appears later in the ledger.
pub fn opening_balance<'a>(transactions: impl IntoIterator<Item = &'a LedgerTransaction>) -> Decimal {
    transactions
        .into_iter()
        .filter(|t| t.is_opening_balance())
        .max_by_key(|t| t.created_at)
        .map(|t| t.amount)
        .unwrap_or(Decimal::ZERO)
}

/// `closing = eligibility + opening - availed`, with nothing rounded.
pub fn reconcile(
    variant: &LeaveVariant,
    eligibility: Decimal,
    eligibility_source: EligibilitySource,
    opening_balance: Decimal,
    availed: Availed,
) -> VariantBalance {
    let total_eligibility = eligibility + opening_balance;
    let total_availed = availed.total();

    VariantBalance {
        variant_id: variant.id,
        variant_name: variant.name.clone(),
        leave_type_name: variant.leave_type_name.clone(),
        eligibility,
        opening_balance,
        total_eligibility,
        availed: total_availed,
        approved_days: availed.approved_days,
        pending_days: availed.pending_days,
        imported_availed: availed.imported_availed,
        pending_count: availed.pending_count,
        closing_balance: total_eligibility - total_availed,
        eligibility_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{configured, ledger};
    use crate::model::VariantRef;
    use crate::model::leave_variant::{AccrualMethod, GrantFrequency};
    use crate::model::ledger_transaction::{TransactionKind, TransactionSubKind};
    use rust_decimal_macros::dec;

    const R: VariantRef = VariantRef::ByVariantId(1);

    #[test]
    fn last_import_wins_over_earlier_ones() {
        let transactions = vec![
            ledger(1, R, TransactionKind::OpeningBalanceImport, TransactionSubKind::OpeningBalance, dec!(3), 100),
            ledger(2, R, TransactionKind::OpeningBalanceImport, TransactionSubKind::OpeningBalance, dec!(5), 200),
        ];
        assert_eq!(opening_balance(&transactions), dec!(5));
    }

    #[test]
    fn latest_import_wins_regardless_of_ledger_order() {
        let transactions = vec![
            ledger(2, R, TransactionKind::OpeningBalanceImport, TransactionSubKind::Unclassified, dec!(5), 200),
            ledger(1, R, TransactionKind::OpeningBalanceImport, TransactionSubKind::Unclassified, dec!(3), 100),
        ];
        assert_eq!(opening_balance(&transactions), dec!(5));
    }

    #[test]
    fn equal_timestamps_take_the_later_row() {
        let transactions = vec![
            ledger(1, R, TransactionKind::OpeningBalanceImport, TransactionSubKind::OpeningBalance, dec!(3), 100),
            ledger(2, R, TransactionKind::OpeningBalanceImport, TransactionSubKind::OpeningBalance, dec!(4), 100),
        ];
        assert_eq!(opening_balance(&transactions), dec!(4));
    }

    #[test]
    fn legacy_opening_rows_under_other_kinds_are_recognised() {
        let transactions = vec![
            ledger(1, R, TransactionKind::Grant, TransactionSubKind::OpeningBalance, dec!(6), 100),
            ledger(2, R, TransactionKind::Grant, TransactionSubKind::Unclassified, dec!(50), 300),
        ];
        assert_eq!(opening_balance(&transactions), dec!(6));
    }

    #[test]
    fn no_import_means_zero_opening_balance() {
        assert_eq!(opening_balance([]), Decimal::ZERO);
    }

    #[test]
    fn closing_balance_identity() {
        let v = configured(AccrualMethod::InAdvance, GrantFrequency::PerYear, Some(dec!(10)), false);
        let availed = Availed {
            approved_days: dec!(2),
            ..Availed::default()
        };
        let balance = reconcile(&v, dec!(10), EligibilitySource::Schedule, dec!(5), availed);
        assert_eq!(balance.total_eligibility, dec!(15));
        assert_eq!(balance.availed, dec!(2));
        assert_eq!(balance.closing_balance, dec!(13));
    }
}
