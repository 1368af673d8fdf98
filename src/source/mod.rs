//! Boundary to the collaborators that own leave configuration and history.
//!
//! Implementations may block on the network; the engine never does.

pub mod memory;
pub mod mysql;

use futures::future::BoxFuture;

use crate::error::{DataIssue, SourceError};
use crate::model::{
    EmployeeId, OrgId, VariantId, assignment::Assignment, balance_snapshot::BalanceSnapshot,
    leave_request::LeaveRequest, ledger_transaction::LedgerTransaction,
    leave_variant::LeaveVariant,
};

/// Rows that made it through ingestion plus the ones that were dropped or
/// patched on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested<T> {
    pub rows: Vec<T>,
    pub issues: Vec<DataIssue>,
}

impl<T> Ingested<T> {
    pub fn clean(rows: Vec<T>) -> Self {
        Self {
            rows,
            issues: Vec::new(),
        }
    }
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Self::clean(Vec::new())
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

pub trait LeaveDataSource: Send + Sync {
    /// The variant catalog for an organisation (all organisations when `None`).
    fn list_variants(&self, org_id: Option<OrgId>)
    -> BoxFuture<'_, SourceResult<Ingested<LeaveVariant>>>;

    /// Every assignment in the organisation, not only one employee's. The
    /// resolver needs the tenant-wide count to decide on its fallback.
    fn list_assignments(&self, org_id: Option<OrgId>) -> BoxFuture<'_, SourceResult<Vec<Assignment>>>;

    fn list_ledger_transactions(
        &self,
        employee_id: EmployeeId,
    ) -> BoxFuture<'_, SourceResult<Ingested<LedgerTransaction>>>;

    fn list_leave_requests(
        &self,
        employee_id: EmployeeId,
    ) -> BoxFuture<'_, SourceResult<Ingested<LeaveRequest>>>;

    fn get_balance_snapshot(
        &self,
        employee_id: EmployeeId,
        variant_id: VariantId,
    ) -> BoxFuture<'_, SourceResult<Option<BalanceSnapshot>>>;
}
