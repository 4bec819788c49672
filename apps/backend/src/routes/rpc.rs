//! The single RPC endpoint: `POST /api/rpc/{procedure}`.
//!
//! The body is the procedure's JSON input (an empty body stands for `{}`
//! so parameterless procedures need no payload). Output is the procedure's
//! JSON result; failures are problem-details responses via `AppError`.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde_json::Value;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::rpc::context::Ctx;
use crate::rpc::registry;
use crate::state::app_state::AppState;

async fn call_procedure(
    http_req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();

    let raw: Value = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            AppError::bad_request(ErrorCode::BadRequest, classify_json_error(&e))
        })?
    };

    let ctx = Ctx::new(current_user.id);

    // One transaction per call: reads see a consistent snapshot, bulk writes
    // commit or roll back as a unit.
    let result = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { registry::dispatch(txn, ctx, &name, raw).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Classify serde_json::Error and return a sanitized error message
fn classify_json_error(error: &serde_json::Error) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            let line = error.line();
            format!("Invalid JSON at line {line}")
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: wrong types for one or more fields".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{procedure}").route(web::post().to(call_procedure)));
}
