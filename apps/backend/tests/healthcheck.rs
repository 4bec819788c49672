//! Health endpoint behavior with and without a database.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::infra::state::build_state;
use backend::routes;

use common::test_state;

#[tokio::test]
async fn health_reports_ok_with_database() {
    let state = test_state().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["migrations"], "1");
    assert!(body["time"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn health_reports_unconfigured_database() {
    let state = build_state().build().await.expect("state without db");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "not_configured");
}
