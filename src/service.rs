use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_web::rt::time::timeout;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::engine::{self, BalanceAggregate, Computation, EngineInput};
use crate::error::{BalanceError, Collection, DataIssue, SourceError};
use crate::model::{
    EmployeeId, OrgId, VariantId, balance_snapshot::BalanceSnapshot, leave_variant::LeaveVariant,
};
use crate::source::LeaveDataSource;

/// Request-scoped inputs for one computation. Nothing is read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceContext {
    pub employee_id: EmployeeId,
    pub org_id: Option<OrgId>,
    pub as_of: NaiveDate,
}

impl BalanceContext {
    /// `as_of` defaults to today's UTC date.
    pub fn new(employee_id: EmployeeId, org_id: Option<OrgId>, as_of: Option<NaiveDate>) -> Self {
        Self {
            employee_id,
            org_id,
            as_of: as_of.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }
}

struct Collected {
    input: EngineInput,
    issues: Vec<DataIssue>,
}

/// Fetches inputs from the collaborators and runs the engine.
///
/// Every call recomputes from freshly fetched collections. The four are
/// fetched independently, so results hold "as of the moment of collection";
/// a request approved mid-fetch shows up on the next read.
#[derive(Clone)]
pub struct BalanceService {
    source: Arc<dyn LeaveDataSource>,
    fetch_timeout: Duration,
}

impl BalanceService {
    pub fn new(source: Arc<dyn LeaveDataSource>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    /// Balances for every variant assigned to the employee.
    #[instrument(skip(self), fields(computation_id = %Uuid::new_v4()))]
    pub async fn compute_balances(&self, ctx: BalanceContext) -> Result<Computation, BalanceError> {
        let Collected { mut input, mut issues } = self.collect(ctx).await?;

        let assigned: Vec<VariantId> = engine::assignment::resolve_assigned_variants(
            ctx.employee_id,
            &input.catalog,
            &input.assignments,
        )
        .into_iter()
        .map(|v| v.id)
        .collect();
        input.snapshots = self.snapshots(ctx.employee_id, &assigned).await;

        let mut computation = engine::compute_balances(ctx.employee_id, ctx.as_of, &input);
        issues.append(&mut computation.issues);
        for issue in &issues {
            issue.log(ctx.employee_id, None);
        }
        computation.issues = issues;

        info!(
            variants = computation.balances.len(),
            skipped = computation.issues.len(),
            "Balances computed"
        );
        Ok(computation)
    }

    /// Totals across the employee's assigned variants.
    pub async fn compute_aggregate(&self, ctx: BalanceContext) -> Result<BalanceAggregate, BalanceError> {
        Ok(self.compute_balances(ctx).await?.aggregate())
    }

    /// The variants the employee may use, after the unconfigured-tenant fallback.
    #[instrument(skip(self))]
    pub async fn list_assigned_variants(
        &self,
        ctx: BalanceContext,
    ) -> Result<Vec<LeaveVariant>, BalanceError> {
        let (catalog, assignments) = futures::try_join!(
            self.fetch(Collection::VariantCatalog, self.source.list_variants(ctx.org_id)),
            self.fetch(Collection::Assignments, self.source.list_assignments(ctx.org_id)),
        )?;
        for issue in &catalog.issues {
            issue.log(ctx.employee_id, None);
        }

        Ok(
            engine::assignment::resolve_assigned_variants(ctx.employee_id, &catalog.rows, &assignments)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    async fn collect(&self, ctx: BalanceContext) -> Result<Collected, BalanceError> {
        let (catalog, assignments, ledger, requests) = futures::try_join!(
            self.fetch(Collection::VariantCatalog, self.source.list_variants(ctx.org_id)),
            self.fetch(Collection::Assignments, self.source.list_assignments(ctx.org_id)),
            self.fetch(
                Collection::Ledger,
                self.source.list_ledger_transactions(ctx.employee_id)
            ),
            self.fetch(
                Collection::LeaveRequests,
                self.source.list_leave_requests(ctx.employee_id)
            ),
        )?;

        let mut issues = catalog.issues;
        issues.extend(ledger.issues);
        issues.extend(requests.issues);

        let input = EngineInput {
            catalog: catalog.rows,
            assignments,
            ledger: ledger.rows,
            requests: requests.rows,
            snapshots: HashMap::new(),
        };
        Ok(Collected { input, issues })
    }

    async fn fetch<T>(
        &self,
        collection: Collection,
        fut: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, BalanceError> {
        let result = match timeout(self.fetch_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.fetch_timeout.as_secs())),
        };

        result.map_err(|source| {
            error!(%collection, error = %source, "Failed to load balance input");
            BalanceError::Unavailable { collection, source }
        })
    }

    /// Snapshots are advisory: a failed or slow lookup counts as absent.
    async fn snapshots(
        &self,
        employee_id: EmployeeId,
        variant_ids: &[VariantId],
    ) -> HashMap<VariantId, BalanceSnapshot> {
        let lookups = variant_ids.iter().map(|&variant_id| async move {
            let result = timeout(
                self.fetch_timeout,
                self.source.get_balance_snapshot(employee_id, variant_id),
            )
            .await;
            match result {
                Ok(Ok(snapshot)) => snapshot.map(|s| (variant_id, s)),
                Ok(Err(e)) => {
                    warn!(employee_id, variant_id, error = %e, "Balance snapshot lookup failed");
                    None
                }
                Err(_) => {
                    warn!(employee_id, variant_id, "Balance snapshot lookup timed out");
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}
