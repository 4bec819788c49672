//! Mapping tests: DomainError -> AppError -> HTTP status / code / kind.

use actix_web::http::StatusCode;
use contract::ErrorKind;

use crate::error::AppError;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind,
};
use crate::errors::ErrorCode;

#[test]
fn validation_maps_to_unprocessable_entity() {
    let err: AppError = DomainError::validation("name: must not be empty").into();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn game_not_found_maps_to_404_with_specific_code() {
    let err: AppError = DomainError::not_found(NotFoundKind::Game, "Game 42 not found").into();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn forbidden_is_distinct_from_not_found() {
    let err: AppError =
        DomainError::forbidden(ForbiddenKind::NotShareRecipient, "share 7 is not yours").into();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.code(), ErrorCode::NotShareRecipient);
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn view_only_share_write_maps_to_403() {
    let err: AppError =
        DomainError::forbidden(ForbiddenKind::ViewOnlyShare, "share grants VIEW only").into();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.code(), ErrorCode::ViewOnlyShare);
}

#[test]
fn duplicate_share_conflict_maps_to_409() {
    let err: AppError =
        DomainError::conflict(ConflictKind::DuplicateShare, "already shared").into();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.code(), ErrorCode::DuplicateShare);
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn db_unavailable_is_retryable_infra() {
    let err: AppError =
        DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable").into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), ErrorCode::DbUnavailable);
    assert_eq!(err.kind(), ErrorKind::Infra);
    assert!(err.kind().is_retryable());
}

#[test]
fn validation_is_never_retryable() {
    let err: AppError = DomainError::validation("bad input").into();
    assert!(!err.kind().is_retryable());
}
