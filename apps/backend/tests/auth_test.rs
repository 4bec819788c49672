//! Auth boundary: the JwtExtract middleware plus the CurrentUser extractor.

mod common;

use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpMessage};
use backend::auth::jwt::mint_access_token;
use backend::middleware::jwt_extract::JwtExtract;
use backend::routes;
use serde_json::json;

use common::{assert_problem, open_shared, seed_user, test_state};

#[tokio::test]
async fn missing_bearer_is_rejected() {
    let state = test_state().await;
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/rpc")
                .wrap(JwtExtract)
                .configure(routes::rpc::configure_routes),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/rpc/game.list")
        .set_payload("{}")
        .insert_header(("content-type", "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        "UNAUTHORIZED_MISSING_BEARER",
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let state = test_state().await;
    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/rpc")
                .wrap(JwtExtract)
                .configure(routes::rpc::configure_routes),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/rpc/game.list")
        .insert_header(("authorization", "Bearer not-a-jwt"))
        .set_payload("{}")
        .insert_header(("content-type", "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        "UNAUTHORIZED_INVALID_JWT",
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

#[tokio::test]
async fn valid_token_for_unknown_user_is_forbidden() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let token = mint_access_token(
        "auth0|nobody",
        "nobody@example.test",
        SystemTime::now(),
        &state.security,
    )
    .unwrap();

    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/rpc")
                .wrap(JwtExtract)
                .configure(routes::rpc::configure_routes),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/rpc/game.list")
        .insert_header(("authorization", format!("Bearer {token}")))
        .set_payload("{}")
        .insert_header(("content-type", "application/json"))
        .to_request();
    req.extensions_mut().insert(shared.clone());

    let resp = test::call_service(&app, req).await;
    assert_problem(
        resp,
        "FORBIDDEN_USER_NOT_FOUND",
        "FORBIDDEN",
        StatusCode::FORBIDDEN,
    )
    .await;
}

#[tokio::test]
async fn valid_token_for_known_user_succeeds() {
    let state = test_state().await;
    let shared = open_shared(&state).await;
    let user = seed_user(&shared, "alice").await;
    let token = mint_access_token(
        &user.sub,
        "alice@example.test",
        SystemTime::now(),
        &state.security,
    )
    .unwrap();

    let app = test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/rpc")
                .wrap(JwtExtract)
                .configure(routes::rpc::configure_routes),
        ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/rpc/game.list")
        .insert_header(("authorization", format!("Bearer {token}")))
        .set_payload("{}")
        .insert_header(("content-type", "application/json"))
        .to_request();
    req.extensions_mut().insert(shared.clone());

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}
