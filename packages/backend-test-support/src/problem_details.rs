//! Problem Details test helpers for backend testing
//!
//! Assertion utilities for the stable error contract, deliberately decoupled
//! from backend types: the struct here mirrors the wire shape and nothing
//! else.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Local ProblemDetails struct that matches the backend's structure
/// but doesn't depend on backend types
#[derive(Debug, Deserialize, Serialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
    kind: String,
    trace_id: String,
}

/// Assert that response parts conform to the stable error contract:
/// - HTTP status matches expected
/// - `x-trace-id` header exists and matches the body's `trace_id`
/// - `code` and `kind` match the expected strings
/// - optionally, `detail` contains a given substring
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_kind: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) {
    assert_eq!(
        status, expected_status,
        "unexpected HTTP status; body: {}",
        String::from_utf8_lossy(body_bytes)
    );

    let body: ProblemDetailsLike = serde_json::from_slice(body_bytes).unwrap_or_else(|e| {
        panic!(
            "response body is not problem details ({e}): {}",
            String::from_utf8_lossy(body_bytes)
        )
    });

    assert_eq!(body.code, expected_code, "unexpected error code");
    assert_eq!(body.kind, expected_kind, "unexpected error kind");
    assert_eq!(body.status, expected_status.as_u16());
    assert!(
        body.type_.ends_with(&body.code),
        "type URI should end with the code: {}",
        body.type_
    );

    let header_trace = headers
        .get("x-trace-id")
        .expect("x-trace-id header missing")
        .to_str()
        .expect("x-trace-id header not valid UTF-8");
    assert_eq!(header_trace, body.trace_id, "header/body trace_id mismatch");

    if let Some(fragment) = expected_detail_contains {
        assert!(
            body.detail.contains(fragment),
            "detail '{}' does not contain '{fragment}'",
            body.detail
        );
    }
}
