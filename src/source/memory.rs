use std::collections::HashSet;
use std::sync::RwLock;

use futures::FutureExt;
use futures::future::{BoxFuture, ready};

use super::{Ingested, LeaveDataSource, SourceResult};
use crate::error::SourceError;
use crate::model::{
    EmployeeId, OrgId, VariantId, assignment::Assignment, balance_snapshot::BalanceSnapshot,
    leave_request::LeaveRequest, ledger_transaction::LedgerTransaction,
    leave_variant::LeaveVariant,
};

/// In-memory collaborator used for fixtures, demos and tests.
///
/// Collections can be marked unavailable to exercise the hard-failure path.
#[derive(Default)]
pub struct MemoryLeaveSource {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    variants: Vec<LeaveVariant>,
    assignments: Vec<(Option<OrgId>, Assignment)>,
    ledger: Vec<LedgerTransaction>,
    requests: Vec<LeaveRequest>,
    snapshots: Vec<BalanceSnapshot>,
    unavailable: HashSet<&'static str>,
}

impl MemoryLeaveSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variants(self, variants: impl IntoIterator<Item = LeaveVariant>) -> Self {
        self.write(|s| s.variants.extend(variants));
        self
    }

    pub fn with_assignments(self, assignments: impl IntoIterator<Item = Assignment>) -> Self {
        self.write(|s| s.assignments.extend(assignments.into_iter().map(|a| (None, a))));
        self
    }

    pub fn with_org_assignment(self, org_id: OrgId, assignment: Assignment) -> Self {
        self.write(|s| s.assignments.push((Some(org_id), assignment)));
        self
    }

    pub fn with_ledger(self, transactions: impl IntoIterator<Item = LedgerTransaction>) -> Self {
        self.write(|s| s.ledger.extend(transactions));
        self
    }

    pub fn with_requests(self, requests: impl IntoIterator<Item = LeaveRequest>) -> Self {
        self.write(|s| s.requests.extend(requests));
        self
    }

    pub fn with_snapshot(self, snapshot: BalanceSnapshot) -> Self {
        self.write(|s| s.snapshots.push(snapshot));
        self
    }

    /// Appends a request after construction, as the approval flow would.
    pub fn push_request(&self, request: LeaveRequest) {
        self.write(|s| s.requests.push(request));
    }

    /// Makes every fetch of `collection` fail. Names match the fetch
    /// methods: `variants`, `assignments`, `ledger`, `requests`, `snapshots`.
    pub fn fail(self, collection: &'static str) -> Self {
        self.write(|s| {
            s.unavailable.insert(collection);
        });
        self
    }

    fn write(&self, f: impl FnOnce(&mut State)) {
        let mut guard = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
    }

    fn read<T>(&self, collection: &'static str, f: impl FnOnce(&State) -> T) -> SourceResult<T> {
        let guard = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.unavailable.contains(collection) {
            return Err(SourceError::Other(format!("{collection} unavailable")));
        }
        Ok(f(&guard))
    }
}

impl LeaveDataSource for MemoryLeaveSource {
    fn list_variants(
        &self,
        org_id: Option<OrgId>,
    ) -> BoxFuture<'_, SourceResult<Ingested<LeaveVariant>>> {
        let result = self.read("variants", |s| {
            let rows = s
                .variants
                .iter()
                .filter(|v| org_id.is_none() || v.org_id.is_none() || v.org_id == org_id)
                .cloned()
                .collect();
            Ingested::clean(rows)
        });
        ready(result).boxed()
    }

    fn list_assignments(&self, org_id: Option<OrgId>) -> BoxFuture<'_, SourceResult<Vec<Assignment>>> {
        let result = self.read("assignments", |s| {
            s.assignments
                .iter()
                .filter(|(org, _)| org_id.is_none() || org.is_none() || *org == org_id)
                .map(|(_, a)| *a)
                .collect()
        });
        ready(result).boxed()
    }

    fn list_ledger_transactions(
        &self,
        employee_id: EmployeeId,
    ) -> BoxFuture<'_, SourceResult<Ingested<LedgerTransaction>>> {
        let result = self.read("ledger", |s| {
            Ingested::clean(
                s.ledger
                    .iter()
                    .filter(|t| t.employee_id == employee_id)
                    .cloned()
                    .collect(),
            )
        });
        ready(result).boxed()
    }

    fn list_leave_requests(
        &self,
        employee_id: EmployeeId,
    ) -> BoxFuture<'_, SourceResult<Ingested<LeaveRequest>>> {
        let result = self.read("requests", |s| {
            Ingested::clean(
                s.requests
                    .iter()
                    .filter(|r| r.employee_id == employee_id)
                    .cloned()
                    .collect(),
            )
        });
        ready(result).boxed()
    }

    fn get_balance_snapshot(
        &self,
        employee_id: EmployeeId,
        variant_id: VariantId,
    ) -> BoxFuture<'_, SourceResult<Option<BalanceSnapshot>>> {
        let result = self.read("snapshots", |s| {
            s.snapshots
                .iter()
                .filter(|b| b.employee_id == employee_id && b.leave_variant_id == variant_id)
                .max_by_key(|b| b.materialized_at)
                .cloned()
        });
        ready(result).boxed()
    }
}
