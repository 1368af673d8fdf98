use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::engine::{BalanceAggregate, Computation, VariantBalance};
use crate::error::{BalanceError, DataIssue};
use crate::model::{EmployeeId, leave_variant::LeaveVariant};
use crate::service::{BalanceContext, BalanceService};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    /// Date to compute entitlement for (defaults to today, UTC)
    #[schema(example = "2026-08-20", format = "date", value_type = Option<String>)]
    pub as_of: Option<String>,
}

impl BalanceQuery {
    fn parse_as_of(&self) -> Result<Option<NaiveDate>, BalanceError> {
        self.as_of
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    BalanceError::InvalidContext("as_of must be a date in YYYY-MM-DD format".into())
                })
            })
            .transpose()
    }
}

#[derive(Serialize, ToSchema)]
pub struct BalanceListResponse {
    #[schema(example = 1000)]
    pub employee_id: EmployeeId,
    #[schema(example = "2026-08-20", format = "date", value_type = String)]
    pub as_of: NaiveDate,
    /// Rounded to one decimal place
    pub data: Vec<VariantBalance>,
    /// Totals over `data`, summed before rounding
    pub aggregate: BalanceAggregate,
    /// Records skipped because they could not be attributed or parsed
    #[schema(example = 0)]
    pub skipped_records: usize,
}

#[derive(Serialize, ToSchema)]
pub struct AggregateResponse {
    #[schema(example = 1000)]
    pub employee_id: EmployeeId,
    #[schema(example = "2026-08-20", format = "date", value_type = String)]
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub totals: BalanceAggregate,
}

#[derive(Serialize, ToSchema)]
pub struct AssignedVariantsResponse {
    #[schema(example = 1000)]
    pub employee_id: EmployeeId,
    pub data: Vec<LeaveVariant>,
}

fn balance_list(ctx: BalanceContext, computation: Computation) -> BalanceListResponse {
    let aggregate = computation.aggregate().rounded();
    BalanceListResponse {
        employee_id: ctx.employee_id,
        as_of: ctx.as_of,
        data: computation.balances.iter().map(VariantBalance::rounded).collect(),
        aggregate,
        skipped_records: computation.issues.iter().filter(|i| counts_as_skipped(i)).count(),
    }
}

// A malformed amount keeps its row, so it is not a skipped record.
fn counts_as_skipped(issue: &DataIssue) -> bool {
    !matches!(issue, DataIssue::MalformedAmount { .. })
}

/* =========================
Own balances (self-service)
========================= */
/// Balances for the calling employee, one entry per assigned leave variant
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Per-variant balances", body = BalanceListResponse),
        (status = 400, description = "Invalid as_of date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 503, description = "Unable to load balances", body = Object, example = json!({
            "message": "Unable to load balances",
            "collection": "ledger"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn my_balances(
    auth: AuthUser,
    service: web::Data<BalanceService>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let ctx = BalanceContext::new(auth.own_employee_id()?, auth.org_id, query.parse_as_of()?);
    let computation = service.compute_balances(ctx).await?;
    Ok(HttpResponse::Ok().json(balance_list(ctx, computation)))
}

/// Aggregate balance figures for the calling employee
#[utoipa::path(
    get,
    path = "/api/v1/balance/aggregate",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Totals across assigned variants", body = AggregateResponse),
        (status = 400, description = "Invalid as_of date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 503, description = "Unable to load balances")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn my_aggregate(
    auth: AuthUser,
    service: web::Data<BalanceService>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let ctx = BalanceContext::new(auth.own_employee_id()?, auth.org_id, query.parse_as_of()?);
    let totals = service.compute_aggregate(ctx).await?;
    Ok(HttpResponse::Ok().json(AggregateResponse {
        employee_id: ctx.employee_id,
        as_of: ctx.as_of,
        totals: totals.rounded(),
    }))
}

/* =========================
Employee balances (HR/Admin)
========================= */
/// Balances for any employee, for dashboards and reports
#[utoipa::path(
    get,
    path = "/api/v1/employee/{employee_id}/balance",
    params(
        ("employee_id" = u64, Path, description = "Employee whose balances to compute"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Per-variant balances", body = BalanceListResponse),
        (status = 400, description = "Invalid as_of date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Unable to load balances")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn employee_balances(
    auth: AuthUser,
    service: web::Data<BalanceService>,
    path: web::Path<EmployeeId>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let ctx = BalanceContext::new(path.into_inner(), auth.org_id, query.parse_as_of()?);
    let computation = service.compute_balances(ctx).await?;
    Ok(HttpResponse::Ok().json(balance_list(ctx, computation)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employee/{employee_id}/balance/aggregate",
    params(
        ("employee_id" = u64, Path, description = "Employee whose totals to compute"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Totals across assigned variants", body = AggregateResponse),
        (status = 400, description = "Invalid as_of date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Unable to load balances")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn employee_aggregate(
    auth: AuthUser,
    service: web::Data<BalanceService>,
    path: web::Path<EmployeeId>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let ctx = BalanceContext::new(path.into_inner(), auth.org_id, query.parse_as_of()?);
    let totals = service.compute_aggregate(ctx).await?;
    Ok(HttpResponse::Ok().json(AggregateResponse {
        employee_id: ctx.employee_id,
        as_of: ctx.as_of,
        totals: totals.rounded(),
    }))
}

/// Leave variants assigned to an employee
#[utoipa::path(
    get,
    path = "/api/v1/employee/{employee_id}/leave-variants",
    params(
        ("employee_id" = u64, Path, description = "Employee to resolve variants for")
    ),
    responses(
        (status = 200, description = "Assigned variants", body = AssignedVariantsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Unable to load variants")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn assigned_variants(
    auth: AuthUser,
    service: web::Data<BalanceService>,
    path: web::Path<EmployeeId>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    if auth.employee_id != Some(employee_id) {
        auth.require_hr_or_admin()?;
    }

    let ctx = BalanceContext::new(employee_id, auth.org_id, None);
    let data = service.list_assigned_variants(ctx).await?;
    Ok(HttpResponse::Ok().json(AssignedVariantsResponse { employee_id, data }))
}
