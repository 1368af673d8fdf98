mod common;

use actix_web::{App, http::StatusCode, test, web::Data};
use common::*;
use leave_balance::auth::jwt::TokenType;
use leave_balance::model::VariantRef;
use leave_balance::model::leave_request::LeaveStatus;
use leave_balance::model::leave_variant::{AccrualMethod, GrantFrequency};
use leave_balance::routes;
use leave_balance::service::BalanceService;
use leave_balance::source::memory::MemoryLeaveSource;
use rust_decimal_macros::dec;
use serde_json::Value;

const ADMIN: u8 = 1;
const HR: u8 = 2;
const EMPLOYEE_ROLE: u8 = 3;

fn seeded() -> MemoryLeaveSource {
    MemoryLeaveSource::new()
        .with_variants([
            variant(1, 10, "Casual Leave", AccrualMethod::InAdvance, GrantFrequency::PerYear, Some(dec!(10))),
            variant(2, 20, "Annual Leave", AccrualMethod::AfterEarning, GrantFrequency::Monthly, Some(dec!(20))),
        ])
        .with_assignments([assign(1), assign(2)])
        .with_ledger([opening_import(1, 1, dec!(5), 1_700_000_000)])
        .with_requests([request(1, VariantRef::ByVariantId(1), LeaveStatus::Approved, dec!(2))])
}

macro_rules! app {
    ($service:expr) => {{
        let config = test_config();
        test::init_service(
            App::new()
                .app_data(Data::new($service))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, config.clone())),
        )
        .await
    }};
}

fn get(uri: &str, bearer: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::get()
        .uri(uri)
        .peer_addr("127.0.0.1:8080".parse().unwrap());
    match bearer {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    }
}

#[actix_web::test]
async fn own_balances_are_rounded_strings() {
    let app = app!(service(seeded()));
    let token = token(EMPLOYEE_ROLE, Some(EMPLOYEE), TokenType::Access);

    let resp = test::call_service(&app, get("/api/v1/balance?as_of=2026-07-31", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employee_id"], 1000);
    assert_eq!(body["as_of"], "2026-07-31");
    assert_eq!(body["skipped_records"], 0);

    let casual = &body["data"][0];
    assert_eq!(casual["variant_id"], 1);
    assert_eq!(casual["closing_balance"], "13.0");
    // after earning: 20 * 6 / 12, July itself is not yet earned
    let annual = &body["data"][1];
    assert_eq!(annual["eligibility"], "10.0");
    assert_eq!(body["aggregate"]["total_balance"], "23.0");
}

#[actix_web::test]
async fn aggregate_endpoint_returns_totals_only() {
    let app = app!(service(seeded()));
    let token = token(EMPLOYEE_ROLE, Some(EMPLOYEE), TokenType::Access);

    let resp = test::call_service(
        &app,
        get("/api/v1/balance/aggregate?as_of=2026-07-31", Some(&token)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total_eligibility"], "25.0");
    assert_eq!(body["total_availed"], "2.0");
    assert_eq!(body["total_balance"], "23.0");
    assert!(body.get("data").is_none());
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let app = app!(service(seeded()));
    let resp = test::call_service(&app, get("/api/v1/balance", None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn refresh_token_is_rejected() {
    let app = app!(service(seeded()));
    let token = token(EMPLOYEE_ROLE, Some(EMPLOYEE), TokenType::Refresh);

    let resp = test::call_service(&app, get("/api/v1/balance", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Access token required");
}

#[actix_web::test]
async fn user_without_employee_profile_is_forbidden() {
    let app = app!(service(seeded()));
    let token = token(ADMIN, None, TokenType::Access);

    let resp = test::call_service(&app, get("/api/v1/balance", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn employee_cannot_read_another_employees_balances() {
    let app = app!(service(seeded()));
    let token = token(EMPLOYEE_ROLE, Some(42), TokenType::Access);

    let resp = test::call_service(&app, get("/api/v1/employee/1000/balance", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn hr_reads_employee_balances() {
    let app = app!(service(seeded()));
    let token = token(HR, None, TokenType::Access);

    let resp = test::call_service(
        &app,
        get("/api/v1/employee/1000/balance?as_of=2026-07-31", Some(&token)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let resp = test::call_service(
        &app,
        get("/api/v1/employee/1000/balance/aggregate?as_of=2026-07-31", Some(&token)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn malformed_as_of_is_bad_request() {
    let app = app!(service(seeded()));
    let token = token(EMPLOYEE_ROLE, Some(EMPLOYEE), TokenType::Access);

    let resp = test::call_service(&app, get("/api/v1/balance?as_of=31-07-2026", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unavailable_ledger_is_service_unavailable() {
    let app = app!(service(seeded().fail("ledger")));
    let token = token(EMPLOYEE_ROLE, Some(EMPLOYEE), TokenType::Access);

    let resp = test::call_service(&app, get("/api/v1/balance", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unable to load balances");
    assert_eq!(body["collection"], "ledger");
}

#[actix_web::test]
async fn own_leave_variants_are_listed() {
    let app = app!(service(seeded()));
    let token = token(EMPLOYEE_ROLE, Some(EMPLOYEE), TokenType::Access);

    let resp = test::call_service(&app, get("/api/v1/employee/1000/leave-variants", Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["leave_type_name"].as_str())
        .collect();
    assert_eq!(names, ["Casual Leave", "Annual Leave"]);
}

#[actix_web::test]
async fn cloned_service_reads_the_same_source() {
    let svc: BalanceService = service(seeded());
    let clone = svc.clone();
    let ctx = ctx(date(2026, 7, 31));
    assert_eq!(
        svc.compute_balances(ctx).await.unwrap(),
        clone.compute_balances(ctx).await.unwrap()
    );
}
