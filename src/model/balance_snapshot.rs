use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, VariantId};

/// Figures last materialized by the external recompute job.
///
/// Advisory only: live ledger values always win, and `total_entitlement`
/// is consulted solely when the variant carries no allocation of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub employee_id: EmployeeId,
    pub leave_variant_id: VariantId,
    pub current_balance: Option<Decimal>,
    pub total_entitlement: Option<Decimal>,
    pub materialized_at: DateTime<Utc>,
}

impl BalanceSnapshot {
    /// True when the ledger has moved on since the snapshot was taken.
    pub fn is_stale(&self, latest_ledger_activity: Option<DateTime<Utc>>) -> bool {
        latest_ledger_activity.is_some_and(|at| at > self.materialized_at)
    }
}
