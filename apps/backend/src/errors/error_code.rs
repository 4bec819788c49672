//! Error codes for the tablescore backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the tablescore backend API.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Access denied
    Forbidden,
    /// User not found in database
    ForbiddenUserNotFound,
    /// Share exists but is addressed to a different recipient
    NotShareRecipient,
    /// Share grants VIEW only; the operation writes
    ViewOnlyShare,

    // Request Validation
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// RPC procedure name not registered
    UnknownProcedure,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Game share not found
    GameShareNotFound,
    /// Player not found
    PlayerNotFound,
    /// Match not found
    MatchNotFound,
    /// Scoresheet not found
    ScoresheetNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Game or player already shared with that recipient
    DuplicateShare,
    /// Unique constraint violation (SQLSTATE 23505; generic 409)
    UniqueViolation,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Authentication & Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::NotShareRecipient => "NOT_SHARE_RECIPIENT",
            Self::ViewOnlyShare => "VIEW_ONLY_SHARE",

            // Request Validation
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::UnknownProcedure => "UNKNOWN_PROCEDURE",

            // Resource Not Found
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::GameShareNotFound => "GAME_SHARE_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::ScoresheetNotFound => "SCORESHEET_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::DuplicateShare => "DUPLICATE_SHARE",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
