pub mod assignment;
pub mod balance_snapshot;
pub mod ledger_transaction;
pub mod leave_request;
pub mod leave_type;
pub mod leave_variant;
pub mod role;

use serde::{Deserialize, Serialize};

use self::leave_type::LeaveTypeId;

pub type EmployeeId = u64;
pub type VariantId = u64;
pub type OrgId = u64;

/// Which variant a request or ledger row was recorded against.
///
/// Older rows predate variant-level granularity and only carry the leave
/// type, so the reference is resolved against the catalog instead of being
/// compared ad hoc at every aggregation site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantRef {
    ByVariantId(VariantId),
    ByLeaveTypeId(LeaveTypeId),
}

impl VariantRef {
    /// Builds a reference from the nullable storage columns. The variant id
    /// wins when both are present.
    pub fn from_columns(
        variant_id: Option<VariantId>,
        leave_type_id: Option<LeaveTypeId>,
    ) -> Option<Self> {
        match (variant_id, leave_type_id) {
            (Some(id), _) => Some(VariantRef::ByVariantId(id)),
            (None, Some(t)) if !t.is_empty() => Some(VariantRef::ByLeaveTypeId(t)),
            _ => None,
        }
    }
}
