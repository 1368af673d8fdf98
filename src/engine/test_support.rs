use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::model::{
    VariantId, VariantRef,
    leave_request::{LeaveRequest, LeaveStatus},
    leave_type::LeaveTypeId,
    ledger_transaction::{LedgerTransaction, TransactionKind, TransactionSubKind},
    leave_variant::{AccrualMethod, GrantFrequency, LeaveVariant},
};

pub fn variant(id: VariantId, leave_type_id: &str, leave_type_name: &str) -> LeaveVariant {
    LeaveVariant {
        id,
        org_id: None,
        name: format!("{leave_type_name} - {id}"),
        leave_type_id: LeaveTypeId::new(leave_type_id),
        leave_type_name: leave_type_name.to_string(),
        accrual_method: AccrualMethod::InAdvance,
        grant_frequency: GrantFrequency::PerYear,
        annual_allocation_days: None,
        deduct_at_request_time: false,
    }
}

pub fn configured(
    accrual_method: AccrualMethod,
    grant_frequency: GrantFrequency,
    annual_allocation_days: Option<Decimal>,
    deduct_at_request_time: bool,
) -> LeaveVariant {
    LeaveVariant {
        accrual_method,
        grant_frequency,
        annual_allocation_days,
        deduct_at_request_time,
        ..variant(1, "10", "Casual Leave")
    }
}

fn request(id: u64, variant: VariantRef, status: LeaveStatus, working_days: Decimal) -> LeaveRequest {
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    LeaveRequest {
        id,
        employee_id: 7,
        variant,
        status,
        working_days,
        start_date: day,
        end_date: day,
    }
}

pub fn approved(id: u64, variant: VariantRef, working_days: Decimal) -> LeaveRequest {
    request(id, variant, LeaveStatus::Approved, working_days)
}

pub fn pending(id: u64, variant: VariantRef, working_days: Decimal) -> LeaveRequest {
    request(id, variant, LeaveStatus::Pending, working_days)
}

pub fn rejected(id: u64, variant: VariantRef, working_days: Decimal) -> LeaveRequest {
    request(id, variant, LeaveStatus::Rejected, working_days)
}

pub fn ledger(
    id: u64,
    variant: VariantRef,
    kind: TransactionKind,
    sub_kind: TransactionSubKind,
    amount: Decimal,
    created_at_secs: i64,
) -> LedgerTransaction {
    LedgerTransaction {
        id,
        employee_id: 7,
        variant,
        kind,
        sub_kind,
        amount,
        description: String::new(),
        created_at: Utc.timestamp_opt(created_at_secs, 0).unwrap(),
    }
}
