#![allow(dead_code)] // not every test binary uses every helper

//! Shared helpers for backend integration tests.
//!
//! Tests run against a fresh SQLite in-memory database (the Test profile
//! without TEST_DB set), seed data through a shared transaction, and inject
//! that transaction plus pre-verified claims into each request.

use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use actix_web::HttpMessage;
use backend::auth::claims::BackendClaims;
use backend::config::db::DbProfile;
use backend::db::require_db;
use backend::db::txn::SharedTxn;
use backend::infra::state::build_state;
use backend::repos::users::{self, User};
use backend::state::app_state::AppState;
use backend_test_support::unique_helpers::{unique_email, unique_sub};
use serde_json::Value;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::test_logging::init();
}

pub async fn test_state() -> AppState {
    build_state()
        .with_db(DbProfile::Test)
        .build()
        .await
        .expect("build test state with DB")
}

pub async fn open_shared(state: &AppState) -> SharedTxn {
    let db = require_db(state).expect("DB required for this test");
    SharedTxn::open(db).await.expect("open shared transaction")
}

pub async fn seed_user(shared: &SharedTxn, prefix: &str) -> User {
    users::create_user(shared.transaction(), &unique_sub(prefix), prefix)
        .await
        .expect("seed user")
}

/// Build a ready-to-send RPC request: body, shared transaction, and verified
/// claims for `sub` already injected (the JwtExtract middleware is bypassed;
/// auth middleware behavior has its own tests).
pub fn rpc_request(
    procedure: &str,
    body: Value,
    shared: &SharedTxn,
    sub: &str,
) -> actix_http::Request {
    let req = TestRequest::post()
        .uri(&format!("/api/rpc/{procedure}"))
        .insert_header(("content-type", "application/json"))
        .set_payload(body.to_string())
        .to_request();

    req.extensions_mut().insert(shared.clone());
    req.extensions_mut().insert(BackendClaims {
        sub: sub.to_string(),
        email: unique_email("claims"),
    });

    req
}

/// Assert a problem-details response and hand back its parts for further
/// checks.
pub async fn assert_problem(
    resp: ServiceResponse,
    expected_code: &str,
    expected_kind: &str,
    expected_status: actix_web::http::StatusCode,
) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;
    backend_test_support::problem_details::assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_kind,
        expected_status,
        None,
    );
}
