//! Leave entitlement and balance computation.
//!
//! Everything in here is pure: the caller supplies a snapshot of the catalog,
//! assignments, ledger and requests, and gets the same balances back for the
//! same inputs. Nothing is cached and nothing is written.

pub mod assignment;
pub mod availed;
pub mod entitlement;
pub mod matching;
pub mod reconciler;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DataIssue;
use crate::model::{
    EmployeeId, VariantId, assignment::Assignment, balance_snapshot::BalanceSnapshot,
    leave_request::LeaveRequest, ledger_transaction::LedgerTransaction,
    leave_variant::LeaveVariant,
};
use crate::utils::amount::round_for_report;

use self::matching::{Attribution, CatalogIndex};

/// Where a variant's eligibility figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EligibilitySource {
    /// The variant's own accrual schedule.
    Schedule,
    /// The materialized snapshot total, for variants with no allocation configured.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "variant_id": 11,
    "variant_name": "Casual Leave - Standard",
    "leave_type_name": "Casual Leave",
    "eligibility": "10",
    "opening_balance": "5",
    "total_eligibility": "15",
    "availed": "2",
    "approved_days": "2",
    "pending_days": "0",
    "imported_availed": "0",
    "pending_count": 1,
    "closing_balance": "13",
    "eligibility_source": "schedule"
}))]
pub struct VariantBalance {
    pub variant_id: VariantId,
    pub variant_name: String,
    pub leave_type_name: String,
    #[schema(value_type = String)]
    pub eligibility: Decimal,
    #[schema(value_type = String)]
    pub opening_balance: Decimal,
    /// `eligibility + opening_balance`
    #[schema(value_type = String)]
    pub total_eligibility: Decimal,
    #[schema(value_type = String)]
    pub availed: Decimal,
    #[schema(value_type = String)]
    pub approved_days: Decimal,
    #[schema(value_type = String)]
    pub pending_days: Decimal,
    #[schema(value_type = String)]
    pub imported_availed: Decimal,
    pub pending_count: u32,
    /// `total_eligibility - availed`
    #[schema(value_type = String)]
    pub closing_balance: Decimal,
    pub eligibility_source: EligibilitySource,
}

impl VariantBalance {
    /// Reporting view, one decimal place.
    pub fn rounded(&self) -> Self {
        Self {
            eligibility: round_for_report(self.eligibility),
            opening_balance: round_for_report(self.opening_balance),
            total_eligibility: round_for_report(self.total_eligibility),
            availed: round_for_report(self.availed),
            approved_days: round_for_report(self.approved_days),
            pending_days: round_for_report(self.pending_days),
            imported_availed: round_for_report(self.imported_availed),
            closing_balance: round_for_report(self.closing_balance),
            ..self.clone()
        }
    }
}

/// Dashboard totals across all assigned variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct BalanceAggregate {
    #[schema(value_type = String, example = "23.5")]
    pub total_eligibility: Decimal,
    #[schema(value_type = String, example = "4")]
    pub total_availed: Decimal,
    #[schema(value_type = String, example = "19.5")]
    pub total_balance: Decimal,
}

impl BalanceAggregate {
    /// Field-wise sums; order of `balances` does not matter.
    pub fn from_balances<'a>(balances: impl IntoIterator<Item = &'a VariantBalance>) -> Self {
        balances
            .into_iter()
            .fold(BalanceAggregate::default(), |acc, b| BalanceAggregate {
                total_eligibility: acc.total_eligibility + b.total_eligibility,
                total_availed: acc.total_availed + b.availed,
                total_balance: acc.total_balance + b.closing_balance,
            })
    }

    pub fn rounded(&self) -> Self {
        Self {
            total_eligibility: round_for_report(self.total_eligibility),
            total_availed: round_for_report(self.total_availed),
            total_balance: round_for_report(self.total_balance),
        }
    }
}

/// One employee's inputs, as collected by the caller.
#[derive(Debug, Clone, Default)]
pub struct EngineInput {
    pub catalog: Vec<LeaveVariant>,
    pub assignments: Vec<Assignment>,
    pub ledger: Vec<LedgerTransaction>,
    pub requests: Vec<LeaveRequest>,
    pub snapshots: HashMap<VariantId, BalanceSnapshot>,
}

/// Balances for every assigned variant plus the records that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Computation {
    pub balances: Vec<VariantBalance>,
    pub issues: Vec<DataIssue>,
}

impl Computation {
    pub fn aggregate(&self) -> BalanceAggregate {
        BalanceAggregate::from_balances(&self.balances)
    }
}

/// Computes balances for every variant assigned to `employee_id`.
pub fn compute_balances(
    employee_id: EmployeeId,
    as_of: NaiveDate,
    input: &EngineInput,
) -> Computation {
    let assigned = assignment::resolve_assigned_variants(employee_id, &input.catalog, &input.assignments);
    let index = CatalogIndex::new(&input.catalog);
    let attribution = Attribution::build(&index, &input.requests, &input.ledger);

    let balances = assigned
        .into_iter()
        .map(|variant| {
            let transactions = attribution.transactions_for(variant.id);
            let snapshot = input.snapshots.get(&variant.id);

            let (eligibility, source) = variant_eligibility(variant, as_of, snapshot, transactions);
            let opening = reconciler::opening_balance(transactions.iter().copied());
            let used = availed::availed(
                variant,
                attribution.requests_for(variant.id).iter().copied(),
                transactions.iter().copied(),
            );

            reconciler::reconcile(variant, eligibility, source, opening, used)
        })
        .collect();

    Computation {
        balances,
        issues: attribution.issues,
    }
}

fn variant_eligibility(
    variant: &LeaveVariant,
    as_of: NaiveDate,
    snapshot: Option<&BalanceSnapshot>,
    transactions: &[&LedgerTransaction],
) -> (Decimal, EligibilitySource) {
    if variant.configured_allocation().is_some() {
        return (entitlement::eligibility(variant, as_of, None), EligibilitySource::Schedule);
    }

    match snapshot.and_then(|s| s.total_entitlement.map(|total| (s, total))) {
        Some((snapshot, total)) => {
            let latest = transactions.iter().map(|t| t.created_at).max();
            if snapshot.is_stale(latest) {
                tracing::debug!(
                    employee_id = snapshot.employee_id,
                    variant_id = variant.id,
                    materialized_at = %snapshot.materialized_at,
                    "Balance snapshot is older than the ledger; using its entitlement total only"
                );
            }
            (
                entitlement::eligibility(variant, as_of, Some(total)),
                EligibilitySource::Snapshot,
            )
        }
        None => (Decimal::ZERO, EligibilitySource::Schedule),
    }
}
