use std::collections::HashMap;

use crate::error::{DataIssue, RecordKind};
use crate::model::{
    VariantId, VariantRef, leave_request::LeaveRequest, leave_type::LeaveTypeId,
    ledger_transaction::LedgerTransaction, leave_variant::LeaveVariant,
};

/// Lookup tables over the full catalog, built once per computation.
pub struct CatalogIndex<'a> {
    by_id: HashMap<VariantId, &'a LeaveVariant>,
    by_leave_type: HashMap<&'a LeaveTypeId, Vec<VariantId>>,
    by_leave_type_name: HashMap<&'a str, Vec<VariantId>>,
}

impl<'a> CatalogIndex<'a> {
    pub fn new(catalog: &'a [LeaveVariant]) -> Self {
        let mut by_id = HashMap::with_capacity(catalog.len());
        let mut by_leave_type: HashMap<&'a LeaveTypeId, Vec<VariantId>> = HashMap::new();
        let mut by_leave_type_name: HashMap<&'a str, Vec<VariantId>> = HashMap::new();

        for variant in catalog {
            by_id.insert(variant.id, variant);
            by_leave_type
                .entry(&variant.leave_type_id)
                .or_default()
                .push(variant.id);
            by_leave_type_name
                .entry(variant.leave_type_name.as_str())
                .or_default()
                .push(variant.id);
        }

        Self {
            by_id,
            by_leave_type,
            by_leave_type_name,
        }
    }

    pub fn variant(&self, id: VariantId) -> Option<&'a LeaveVariant> {
        self.by_id.get(&id).copied()
    }

    /// Variants a leave request counts against: the exact variant, or every
    /// variant of the referenced leave type.
    pub fn request_targets(&self, reference: &VariantRef) -> &[VariantId] {
        match reference {
            VariantRef::ByVariantId(id) => match self.by_id.get(id) {
                Some(variant) => std::slice::from_ref(&variant.id),
                None => &[],
            },
            VariantRef::ByLeaveTypeId(leave_type) => self.by_leave_type_targets(leave_type),
        }
    }

    /// Variants a ledger transaction counts against.
    ///
    /// A transaction recorded on one variant also belongs to every variant
    /// sharing its leave-type name. Imports written before variants existed
    /// depend on this; narrowing it to an exact id match drops them.
    pub fn transaction_targets(&self, reference: &VariantRef) -> &[VariantId] {
        match reference {
            VariantRef::ByVariantId(id) => self
                .by_id
                .get(id)
                .and_then(|variant| self.by_leave_type_name.get(variant.leave_type_name.as_str()))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            VariantRef::ByLeaveTypeId(leave_type) => self.by_leave_type_targets(leave_type),
        }
    }

    fn by_leave_type_targets(&self, leave_type: &LeaveTypeId) -> &[VariantId] {
        self.by_leave_type
            .get(leave_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Requests and ledger rows grouped by the variants they count against.
#[derive(Default)]
pub struct Attribution<'a> {
    pub requests: HashMap<VariantId, Vec<&'a LeaveRequest>>,
    pub transactions: HashMap<VariantId, Vec<&'a LedgerTransaction>>,
    pub issues: Vec<DataIssue>,
}

impl<'a> Attribution<'a> {
    pub fn build(
        index: &CatalogIndex<'_>,
        requests: &'a [LeaveRequest],
        transactions: &'a [LedgerTransaction],
    ) -> Self {
        let mut attribution = Attribution::default();

        for request in requests {
            let targets = index.request_targets(&request.variant);
            if targets.is_empty() {
                attribution.issues.push(DataIssue::MissingConfiguration {
                    record: RecordKind::LeaveRequest,
                    record_id: request.id,
                    reference: request.variant.clone(),
                });
                continue;
            }
            for id in targets {
                attribution.requests.entry(*id).or_default().push(request);
            }
        }

        for transaction in transactions {
            let targets = index.transaction_targets(&transaction.variant);
            if targets.is_empty() {
                attribution.issues.push(DataIssue::MissingConfiguration {
                    record: RecordKind::LedgerTransaction,
                    record_id: transaction.id,
                    reference: transaction.variant.clone(),
                });
                continue;
            }
            for id in targets {
                attribution
                    .transactions
                    .entry(*id)
                    .or_default()
                    .push(transaction);
            }
        }

        attribution
    }

    pub fn requests_for(&self, id: VariantId) -> &[&'a LeaveRequest] {
        self.requests.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn transactions_for(&self, id: VariantId) -> &[&'a LedgerTransaction] {
        self.transactions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
