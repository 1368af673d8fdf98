use crate::api::balance::{
    AggregateResponse, AssignedVariantsResponse, BalanceListResponse, BalanceQuery,
};
use crate::engine::{BalanceAggregate, EligibilitySource, VariantBalance};
use crate::model::leave_variant::{AccrualMethod, GrantFrequency, LeaveVariant};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Balance API",
        version = "1.0.0",
        description = r#"
## Leave Entitlement & Balance Computation

Every dashboard and report reads leave figures from this service, so the numbers agree everywhere.

### 🔹 Figures per leave variant
- **Eligibility**: days earned or granted as of a date
- **Opening balance**: the latest imported carry-forward
- **Availed**: approved requests, pending requests (when the variant deducts at request time) and imported historical consumption
- **Closing balance**: eligibility + opening balance − availed

### 📦 Response Format
- Day amounts are decimal strings rounded to one decimal place
- Totals are summed before rounding
- `503` means the balances could not be loaded; figures are never zero-filled

### 🔐 Security
Endpoints require a **JWT Bearer** access token from the identity service.
Other employees' balances are visible to **Admin** and **HR** only.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::balance::my_balances,
        crate::api::balance::my_aggregate,
        crate::api::balance::employee_balances,
        crate::api::balance::employee_aggregate,
        crate::api::balance::assigned_variants
    ),
    components(
        schemas(
            BalanceQuery,
            BalanceListResponse,
            AggregateResponse,
            AssignedVariantsResponse,
            VariantBalance,
            BalanceAggregate,
            EligibilitySource,
            LeaveVariant,
            AccrualMethod,
            GrantFrequency
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Balance", description = "Leave entitlement and balance APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
