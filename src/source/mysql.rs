use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;
use futures::{FutureExt, TryStreamExt};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use super::{Ingested, LeaveDataSource, SourceResult};
use crate::error::{DataIssue, RecordKind};
use crate::model::{
    EmployeeId, OrgId, VariantId, VariantRef,
    assignment::Assignment,
    balance_snapshot::BalanceSnapshot,
    leave_request::{LeaveRequest, LeaveStatus},
    leave_type::LeaveTypeId,
    ledger_transaction::{LedgerTransaction, TransactionKind, TransactionSubKind},
    leave_variant::{AccrualMethod, GrantFrequency, LeaveVariant},
};
use crate::utils::amount::parse_amount;

/// Reads the collaborator tables described in `migrations/`.
#[derive(Clone)]
pub struct MySqlLeaveSource {
    pool: MySqlPool,
}

impl MySqlLeaveSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/* =========================
Storage rows
========================= */

#[derive(Debug, FromRow)]
pub(crate) struct VariantRow {
    pub id: u64,
    pub org_id: Option<u64>,
    pub name: String,
    pub leave_type_id: Option<String>,
    pub leave_type_name: String,
    pub accrual_method: String,
    pub grant_frequency: String,
    pub annual_allocation_days: Option<Decimal>,
    pub deduct_at_request_time: bool,
}

#[derive(Debug, FromRow)]
pub(crate) struct AssignmentRow {
    pub employee_id: u64,
    pub leave_variant_id: u64,
}

#[derive(Debug, FromRow)]
pub(crate) struct LedgerRow {
    pub id: u64,
    pub employee_id: u64,
    pub leave_variant_id: Option<u64>,
    pub leave_type_id: Option<String>,
    pub kind: String,
    pub sub_kind: Option<String>,
    /// Read as text; legacy imports contain values that are not numbers.
    pub amount: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct RequestRow {
    pub id: u64,
    pub employee_id: u64,
    pub leave_variant_id: Option<u64>,
    pub leave_type_id: Option<String>,
    pub status: Option<String>,
    pub working_days: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, FromRow)]
pub(crate) struct SnapshotRow {
    pub employee_id: u64,
    pub leave_variant_id: u64,
    pub current_balance: Option<Decimal>,
    pub total_entitlement: Option<Decimal>,
    pub materialized_at: DateTime<Utc>,
}

fn unknown(record: RecordKind, record_id: u64, field: &'static str, value: &str) -> DataIssue {
    DataIssue::UnknownEnumValue {
        record,
        record_id,
        field,
        value: value.to_string(),
    }
}

impl VariantRow {
    pub(crate) fn into_variant(self) -> Result<LeaveVariant, DataIssue> {
        let accrual_method = AccrualMethod::from_str(&self.accrual_method).map_err(|_| {
            unknown(RecordKind::LeaveVariant, self.id, "accrual_method", &self.accrual_method)
        })?;
        let grant_frequency = GrantFrequency::from_str(&self.grant_frequency).map_err(|_| {
            unknown(RecordKind::LeaveVariant, self.id, "grant_frequency", &self.grant_frequency)
        })?;

        Ok(LeaveVariant {
            id: self.id,
            org_id: self.org_id,
            name: self.name,
            leave_type_id: LeaveTypeId::new(self.leave_type_id.unwrap_or_default()),
            leave_type_name: self.leave_type_name,
            accrual_method,
            grant_frequency,
            annual_allocation_days: self.annual_allocation_days,
            deduct_at_request_time: self.deduct_at_request_time,
        })
    }
}

impl LedgerRow {
    /// Converts a stored row. A malformed amount keeps the row with an amount
    /// of zero and reports the issue alongside.
    pub(crate) fn into_transaction(self) -> (Option<LedgerTransaction>, Vec<DataIssue>) {
        let mut issues = Vec::new();

        let Some(variant) = VariantRef::from_columns(
            self.leave_variant_id,
            self.leave_type_id.map(LeaveTypeId::new),
        ) else {
            issues.push(DataIssue::UnreferencedRow {
                record: RecordKind::LedgerTransaction,
                record_id: self.id,
            });
            return (None, issues);
        };

        let kind = match TransactionKind::from_str(&self.kind) {
            Ok(kind) => kind,
            Err(_) => {
                issues.push(unknown(RecordKind::LedgerTransaction, self.id, "kind", &self.kind));
                return (None, issues);
            }
        };

        let description = self.description.unwrap_or_default();
        let sub_kind = match self.sub_kind.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => TransactionSubKind::classify_legacy(&description),
            Some(raw) => TransactionSubKind::from_str(raw).unwrap_or_else(|_| {
                issues.push(unknown(RecordKind::LedgerTransaction, self.id, "sub_kind", raw));
                TransactionSubKind::classify_legacy(&description)
            }),
        };

        let raw_amount = self.amount.unwrap_or_default();
        let amount = parse_amount(&raw_amount).unwrap_or_else(|| {
            issues.push(DataIssue::MalformedAmount {
                transaction_id: self.id,
                raw: raw_amount.clone(),
            });
            Decimal::ZERO
        });

        let transaction = LedgerTransaction {
            id: self.id,
            employee_id: self.employee_id,
            variant,
            kind,
            sub_kind,
            amount,
            description,
            created_at: self.created_at,
        };
        (Some(transaction), issues)
    }
}

impl RequestRow {
    pub(crate) fn into_request(self) -> Result<LeaveRequest, DataIssue> {
        let variant = VariantRef::from_columns(
            self.leave_variant_id,
            self.leave_type_id.map(LeaveTypeId::new),
        )
        .ok_or(DataIssue::UnreferencedRow {
            record: RecordKind::LeaveRequest,
            record_id: self.id,
        })?;

        // the column defaults to 'pending' on insert
        let status = match self.status.as_deref() {
            None => LeaveStatus::Pending,
            Some(raw) => LeaveStatus::from_str(raw.trim())
                .map_err(|_| unknown(RecordKind::LeaveRequest, self.id, "status", raw))?,
        };

        Ok(LeaveRequest {
            id: self.id,
            employee_id: self.employee_id,
            variant,
            status,
            working_days: self.working_days.unwrap_or(Decimal::ZERO),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

impl From<SnapshotRow> for BalanceSnapshot {
    fn from(row: SnapshotRow) -> Self {
        BalanceSnapshot {
            employee_id: row.employee_id,
            leave_variant_id: row.leave_variant_id,
            current_balance: row.current_balance,
            total_entitlement: row.total_entitlement,
            materialized_at: row.materialized_at,
        }
    }
}

/* =========================
Queries
========================= */

const VARIANTS_SQL: &str = r#"
    SELECT
        id,
        org_id,
        name,
        CAST(leave_type_id AS CHAR) AS leave_type_id,
        leave_type_name,
        accrual_method,
        grant_frequency,
        annual_allocation_days,
        deduct_at_request_time
    FROM leave_variants
    WHERE (? IS NULL OR org_id IS NULL OR org_id = ?)
    ORDER BY id
"#;

const ASSIGNMENTS_SQL: &str = r#"
    SELECT employee_id, leave_variant_id
    FROM leave_variant_assignments
    WHERE (? IS NULL OR org_id IS NULL OR org_id = ?)
"#;

const LEDGER_SQL: &str = r#"
    SELECT
        id,
        employee_id,
        leave_variant_id,
        CAST(leave_type_id AS CHAR) AS leave_type_id,
        kind,
        sub_kind,
        CAST(amount AS CHAR) AS amount,
        description,
        created_at
    FROM leave_ledger_transactions
    WHERE employee_id = ?
    ORDER BY created_at, id
"#;

const REQUESTS_SQL: &str = r#"
    SELECT
        id,
        employee_id,
        leave_variant_id,
        CAST(leave_type_id AS CHAR) AS leave_type_id,
        status,
        working_days,
        start_date,
        end_date
    FROM leave_requests
    WHERE employee_id = ?
    ORDER BY id
"#;

const SNAPSHOT_SQL: &str = r#"
    SELECT employee_id, leave_variant_id, current_balance, total_entitlement, materialized_at
    FROM leave_balance_snapshots
    WHERE employee_id = ? AND leave_variant_id = ?
    ORDER BY materialized_at DESC
    LIMIT 1
"#;

impl LeaveDataSource for MySqlLeaveSource {
    fn list_variants(
        &self,
        org_id: Option<OrgId>,
    ) -> BoxFuture<'_, SourceResult<Ingested<LeaveVariant>>> {
        async move {
            let rows = sqlx::query_as::<_, VariantRow>(VARIANTS_SQL)
                .bind(org_id)
                .bind(org_id)
                .fetch_all(&self.pool)
                .await?;

            let mut out = Ingested::default();
            for row in rows {
                match row.into_variant() {
                    Ok(variant) => out.rows.push(variant),
                    Err(issue) => out.issues.push(issue),
                }
            }
            Ok(out)
        }
        .boxed()
    }

    fn list_assignments(&self, org_id: Option<OrgId>) -> BoxFuture<'_, SourceResult<Vec<Assignment>>> {
        async move {
            let rows = sqlx::query_as::<_, AssignmentRow>(ASSIGNMENTS_SQL)
                .bind(org_id)
                .bind(org_id)
                .fetch_all(&self.pool)
                .await?;

            Ok(rows
                .into_iter()
                .map(|r| Assignment {
                    employee_id: r.employee_id,
                    leave_variant_id: r.leave_variant_id,
                })
                .collect())
        }
        .boxed()
    }

    fn list_ledger_transactions(
        &self,
        employee_id: EmployeeId,
    ) -> BoxFuture<'_, SourceResult<Ingested<LedgerTransaction>>> {
        async move {
            let mut stream = sqlx::query_as::<_, LedgerRow>(LEDGER_SQL)
                .bind(employee_id)
                .fetch(&self.pool);

            let mut out = Ingested::default();
            while let Some(row) = stream.try_next().await? {
                let (transaction, issues) = row.into_transaction();
                out.rows.extend(transaction);
                out.issues.extend(issues);
            }
            Ok(out)
        }
        .boxed()
    }

    fn list_leave_requests(
        &self,
        employee_id: EmployeeId,
    ) -> BoxFuture<'_, SourceResult<Ingested<LeaveRequest>>> {
        async move {
            let rows = sqlx::query_as::<_, RequestRow>(REQUESTS_SQL)
                .bind(employee_id)
                .fetch_all(&self.pool)
                .await?;

            let mut out = Ingested::default();
            for row in rows {
                match row.into_request() {
                    Ok(request) => out.rows.push(request),
                    Err(issue) => out.issues.push(issue),
                }
            }
            Ok(out)
        }
        .boxed()
    }

    fn get_balance_snapshot(
        &self,
        employee_id: EmployeeId,
        variant_id: VariantId,
    ) -> BoxFuture<'_, SourceResult<Option<BalanceSnapshot>>> {
        async move {
            let row = sqlx::query_as::<_, SnapshotRow>(SNAPSHOT_SQL)
                .bind(employee_id)
                .bind(variant_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row.map(BalanceSnapshot::from))
        }
        .boxed()
    }
}
