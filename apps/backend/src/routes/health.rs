use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    migrations: String,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let now = OffsetDateTime::now_utc();
    let time = now
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    // Check database connectivity and applied-migration count
    let (db_status, db_error, migrations) = match require_db(&app_state) {
        Ok(db) => match db.ping().await {
            Ok(()) => {
                let applied = migration::count_applied_migrations(db)
                    .await
                    .map(|n| n.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                ("ok".to_string(), None, applied)
            }
            Err(e) => ("error".to_string(), Some(e.to_string()), "unknown".into()),
        },
        Err(_) => ("not_configured".to_string(), None, "unknown".into()),
    };

    let status = if db_status == "error" { "degraded" } else { "ok" };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        app_version,
        db: db_status,
        db_error,
        migrations,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(health)));
}
