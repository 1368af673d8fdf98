#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rust_decimal::Decimal;

use leave_balance::auth::jwt::{Claims, TokenType};
use leave_balance::config::Config;
use leave_balance::model::{
    EmployeeId, VariantId, VariantRef,
    assignment::Assignment,
    leave_request::{LeaveRequest, LeaveStatus},
    leave_type::LeaveTypeId,
    ledger_transaction::{LedgerTransaction, TransactionKind, TransactionSubKind},
    leave_variant::{AccrualMethod, GrantFrequency, LeaveVariant},
};
use leave_balance::service::{BalanceContext, BalanceService};
use leave_balance::source::memory::MemoryLeaveSource;

pub const EMPLOYEE: EmployeeId = 1000;
pub const SECRET: &str = "test-secret";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn august() -> NaiveDate {
    date(2026, 8, 14)
}

pub fn ctx(as_of: NaiveDate) -> BalanceContext {
    BalanceContext::new(EMPLOYEE, None, Some(as_of))
}

pub fn service(source: MemoryLeaveSource) -> BalanceService {
    BalanceService::new(Arc::new(source), Duration::from_secs(2))
}

pub fn variant(
    id: VariantId,
    leave_type: u64,
    leave_type_name: &str,
    accrual_method: AccrualMethod,
    grant_frequency: GrantFrequency,
    annual: Option<Decimal>,
) -> LeaveVariant {
    LeaveVariant {
        id,
        org_id: None,
        name: format!("{leave_type_name} - Standard"),
        leave_type_id: LeaveTypeId::from(leave_type),
        leave_type_name: leave_type_name.to_string(),
        accrual_method,
        grant_frequency,
        annual_allocation_days: annual,
        deduct_at_request_time: false,
    }
}

pub fn assign(leave_variant_id: VariantId) -> Assignment {
    Assignment {
        employee_id: EMPLOYEE,
        leave_variant_id,
    }
}

pub fn request(id: u64, variant: VariantRef, status: LeaveStatus, working_days: Decimal) -> LeaveRequest {
    LeaveRequest {
        id,
        employee_id: EMPLOYEE,
        variant,
        status,
        working_days,
        start_date: date(2026, 3, 2),
        end_date: date(2026, 3, 4),
    }
}

pub fn opening_import(id: u64, variant_id: VariantId, amount: Decimal, at_secs: i64) -> LedgerTransaction {
    LedgerTransaction {
        id,
        employee_id: EMPLOYEE,
        variant: VariantRef::ByVariantId(variant_id),
        kind: TransactionKind::OpeningBalanceImport,
        sub_kind: TransactionSubKind::OpeningBalance,
        amount,
        description: "Opening balance imported from Excel".to_string(),
        created_at: Utc.timestamp_opt(at_secs, 0).unwrap(),
    }
}

pub fn imported_availed(id: u64, variant_id: VariantId, amount: Decimal, at_secs: i64) -> LedgerTransaction {
    LedgerTransaction {
        id,
        employee_id: EMPLOYEE,
        variant: VariantRef::ByVariantId(variant_id),
        kind: TransactionKind::Deduction,
        sub_kind: TransactionSubKind::ImportedAvailed,
        amount,
        description: "Imported leave transaction availed".to_string(),
        created_at: Utc.timestamp_opt(at_secs, 0).unwrap(),
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "mysql://unused".to_string(),
        jwt_secret: SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        api_prefix: "/api".to_string(),
        rate_protected_per_min: 6000,
        source_timeout: Duration::from_secs(2),
        db_max_connections: 1,
        log_dir: "logs".to_string(),
    }
}

/// Role ids: 1 admin, 2 hr, 3 employee.
pub fn token(role: u8, employee_id: Option<EmployeeId>, token_type: TokenType) -> String {
    let claims = Claims {
        user_id: 1,
        sub: "tester".to_string(),
        role,
        exp: (Utc::now().timestamp() + 3600) as usize,
        jti: "jti-1".to_string(),
        token_type,
        employee_id,
        org_id: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}
