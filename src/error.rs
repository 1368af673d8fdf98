use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;

use crate::model::{EmployeeId, VariantId, VariantRef};

/// Failure of an external collaborator fetch.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}

/// The four collections a computation cannot proceed without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    VariantCatalog,
    Assignments,
    Ledger,
    LeaveRequests,
}

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("unable to load {collection}: {source}")]
    Unavailable {
        collection: Collection,
        #[source]
        source: SourceError,
    },

    #[error("invalid request context: {0}")]
    InvalidContext(String),
}

impl ResponseError for BalanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            BalanceError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            BalanceError::InvalidContext(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            BalanceError::Unavailable { collection, .. } => {
                HttpResponse::build(self.status_code()).json(serde_json::json!({
                    "message": "Unable to load balances",
                    "collection": collection,
                }))
            }
            BalanceError::InvalidContext(reason) => {
                HttpResponse::build(self.status_code()).json(serde_json::json!({
                    "message": reason,
                }))
            }
        }
    }
}

/// A single bad record. Absorbed so it degrades one line item, not the report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum DataIssue {
    #[error("{record} {record_id} references {reference:?}, which is not in the catalog")]
    MissingConfiguration {
        record: RecordKind,
        record_id: u64,
        reference: VariantRef,
    },

    #[error("ledger transaction {transaction_id} has unparseable amount {raw:?}; counted as 0")]
    MalformedAmount { transaction_id: u64, raw: String },

    #[error("{record} {record_id} has unknown {field} {value:?}")]
    UnknownEnumValue {
        record: RecordKind,
        record_id: u64,
        field: &'static str,
        value: String,
    },

    #[error("{record} {record_id} carries neither a variant nor a leave type")]
    UnreferencedRow { record: RecordKind, record_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    LeaveVariant,
    LedgerTransaction,
    LeaveRequest,
}

impl DataIssue {
    /// Employee-scoped context for log lines.
    pub fn log(&self, employee_id: EmployeeId, variant_id: Option<VariantId>) {
        tracing::warn!(employee_id, ?variant_id, issue = %self, "Skipped record during balance computation");
    }
}
