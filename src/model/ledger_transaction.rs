use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use super::{EmployeeId, VariantRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum TransactionKind {
    #[strum(to_string = "grant", serialize = "Grant")]
    Grant,
    #[strum(
        to_string = "opening_balance_import",
        serialize = "OpeningBalanceImport",
        serialize = "opening_balance"
    )]
    OpeningBalanceImport,
    #[strum(to_string = "deduction", serialize = "Deduction")]
    Deduction,
    #[strum(to_string = "debit", serialize = "Debit")]
    Debit,
}

/// Machine-readable tag that replaces matching on the free-text description.
///
/// Only the sub-kinds evidenced in historical descriptions exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransactionSubKind {
    /// Carried-forward balance imported from the previous system.
    OpeningBalance,
    /// Consumption recorded in the previous system and imported as a deduction.
    ImportedAvailed,
    Unclassified,
}

const OPENING_BALANCE_MARKER: &str = "opening balance imported";
const IMPORTED_TRANSACTION_MARKER: &str = "imported leave transaction";
const AVAILED_MARKER: &str = "availed";

impl TransactionSubKind {
    /// Classifies a legacy row that was stored without a sub-kind.
    /// Runs once at ingestion; nothing downstream reads the description.
    pub fn classify_legacy(description: &str) -> Self {
        let text = description.to_lowercase();
        if text.contains(OPENING_BALANCE_MARKER) {
            TransactionSubKind::OpeningBalance
        } else if text.contains(IMPORTED_TRANSACTION_MARKER) && text.contains(AVAILED_MARKER) {
            TransactionSubKind::ImportedAvailed
        } else {
            TransactionSubKind::Unclassified
        }
    }
}

/// Append-only ledger row. Corrections are new offsetting rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub id: u64,
    pub employee_id: EmployeeId,
    pub variant: VariantRef,
    pub kind: TransactionKind,
    pub sub_kind: TransactionSubKind,
    /// Signed. Deductions may be stored negative or as magnitudes.
    pub amount: Decimal,
    /// Human-readable annotation only.
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerTransaction {
    pub fn is_opening_balance(&self) -> bool {
        self.kind == TransactionKind::OpeningBalanceImport
            || self.sub_kind == TransactionSubKind::OpeningBalance
    }

    pub fn is_imported_availed(&self) -> bool {
        matches!(self.kind, TransactionKind::Deduction | TransactionKind::Debit)
            && self.sub_kind == TransactionSubKind::ImportedAvailed
    }
}
