//! JWT extraction middleware
//!
//! Extracts JWT claims from the Authorization header and stores them in
//! request extensions. It only runs on protected routes (/api/rpc/*) and
//! returns 401 if no valid claims are found.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::BackendClaims;
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        let token = match extract_bearer_from_header(auth_header.as_ref()) {
            Ok(token) => token,
            Err(err) => return Box::pin(async { Err(err.into()) }),
        };

        let Some(app_state) = app_state else {
            return Box::pin(async {
                Err(AppError::internal("AppState not available".to_string()).into())
            });
        };

        let claims = match verify_access_token(&token, &app_state.security) {
            Ok(claims) => claims,
            Err(err) => return Box::pin(async { Err(err.into()) }),
        };

        req.extensions_mut().insert(BackendClaims {
            sub: claims.sub,
            email: claims.email,
        });

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

fn extract_bearer_from_header(
    header_value: Option<&header::HeaderValue>,
) -> Result<String, AppError> {
    let value = header_value.ok_or_else(AppError::unauthorized_missing_bearer)?;
    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}
