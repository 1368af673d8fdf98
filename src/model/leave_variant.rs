use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::leave_type::LeaveTypeId;
use super::{OrgId, VariantId};

/// How entitlement builds up over the plan year.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum AccrualMethod {
    /// Earned for fully elapsed calendar months only.
    #[strum(to_string = "after_earning", serialize = "AfterEarning")]
    AfterEarning,
    /// Made available before it is earned.
    #[strum(to_string = "in_advance", serialize = "InAdvance")]
    InAdvance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum GrantFrequency {
    #[strum(to_string = "monthly", serialize = "Monthly")]
    Monthly,
    #[strum(to_string = "per_year", serialize = "PerYear", serialize = "yearly")]
    PerYear,
}

/// A configured sub-type of a leave type carrying its own accrual rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 11,
    "org_id": 1,
    "name": "Casual Leave - Standard",
    "leave_type_id": "3",
    "leave_type_name": "Casual Leave",
    "accrual_method": "after_earning",
    "grant_frequency": "monthly",
    "annual_allocation_days": "12",
    "deduct_at_request_time": false
}))]
pub struct LeaveVariant {
    pub id: VariantId,
    pub org_id: Option<OrgId>,
    pub name: String,
    #[schema(value_type = String)]
    pub leave_type_id: LeaveTypeId,
    pub leave_type_name: String,
    pub accrual_method: AccrualMethod,
    pub grant_frequency: GrantFrequency,
    /// Absent on variants configured before allocations were tracked.
    #[schema(value_type = Option<String>)]
    pub annual_allocation_days: Option<Decimal>,
    /// Pending requests reduce availability when set; otherwise only approved ones do.
    pub deduct_at_request_time: bool,
}

impl LeaveVariant {
    /// The configured allocation, or `None` when it is missing or zero.
    pub fn configured_allocation(&self) -> Option<Decimal> {
        self.annual_allocation_days.filter(|days| !days.is_zero())
    }
}
