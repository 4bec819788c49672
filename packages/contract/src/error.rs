//! Wire error taxonomy.
//!
//! The server reports failures as RFC 7807 problem details carrying a stable
//! `code` plus a coarse `kind`. The kind is what clients branch on: infra
//! failures are retryable, validation failures are not (retrying resends the
//! same invalid input).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or rule-violating input, rejected before side effects.
    Validation,
    /// Missing or unusable credentials.
    Unauthorized,
    /// The actor does not own or see the requested entity. Reported
    /// distinctly from `NotFound`: "not yours" is not "doesn't exist".
    Forbidden,
    /// A write addressed a row that does not exist. Reads report absence as
    /// a `null` result instead, never through this kind.
    NotFound,
    /// Semantic conflict with existing state.
    Conflict,
    /// Infrastructure failure (database or service unavailable). Retryable.
    Infra,
}

impl ErrorKind {
    /// Whether a client may re-issue the identical request and plausibly
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Infra)
    }
}

/// A structured remote error as decoded from a problem-details response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {detail}")]
pub struct RpcError {
    pub kind: ErrorKind,
    /// Stable SCREAMING_SNAKE_CASE code, e.g. `GAME_NOT_FOUND`.
    pub code: String,
    pub detail: String,
    /// Trace id echoed by the server, for correlating logs.
    #[serde(default)]
    pub trace_id: Option<String>,
}

impl RpcError {
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_infra_is_retryable() {
        assert!(ErrorKind::Infra.is_retryable());
        for kind in [
            ErrorKind::Validation,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
        ] {
            assert!(!kind.is_retryable(), "{kind:?} must not be retryable");
        }
    }

    #[test]
    fn kind_uses_screaming_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::Validation).unwrap(),
            r#""VALIDATION""#
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::NotFound).unwrap(),
            r#""NOT_FOUND""#
        );
    }
}
