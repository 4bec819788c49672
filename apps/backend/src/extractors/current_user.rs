use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::claims::BackendClaims;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The acting user, resolved from JWT claims stored in request extensions by
/// the JwtExtract middleware. The claims carry the external subject; the
/// database row supplies the id every scoped repository call requires.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub sub: String,
    pub email: Option<String>,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Read BackendClaims from request extensions (stored by JwtExtract middleware)
            let claims = req
                .extensions()
                .get::<BackendClaims>()
                .ok_or_else(AppError::unauthorized_missing_bearer)?
                .clone();

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available".to_string()))?;

            // Look up user by sub, through the shared transaction when a test
            // injected one
            let user = if let Some(shared_txn) = SharedTxn::from_req(&req) {
                users::find_by_sub(shared_txn.transaction(), &claims.sub).await?
            } else {
                let db = require_db(app_state)?;
                users::find_by_sub(db, &claims.sub).await?
            };

            let user = user.ok_or(AppError::forbidden_user_not_found())?;

            // Use sub and email from JWT claims (already validated); the
            // database lookup only supplies the id.
            Ok(CurrentUser {
                id: user.id,
                sub: claims.sub,
                email: Some(claims.email),
            })
        })
    }
}
