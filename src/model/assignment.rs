use serde::{Deserialize, Serialize};

use super::{EmployeeId, VariantId};

/// Makes a leave variant visible to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub employee_id: EmployeeId,
    pub leave_variant_id: VariantId,
}
