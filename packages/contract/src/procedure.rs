//! The typed procedure contract.
//!
//! A [`Procedure`] binds a wire name (`namespace.method`) to an input and an
//! output type. Inputs validate themselves before any server-side work runs;
//! a failed validation never reaches the repository layer.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A named remote operation with a fixed input and output shape.
///
/// Implementors are zero-sized marker types (`GetGame`, `CreateMatch`, ...).
/// `NAME` is the wire identifier used in the request path and as the client
/// cache-key prefix.
pub trait Procedure {
    const NAME: &'static str;
    type Input: Serialize + DeserializeOwned + ValidateInput + Send + 'static;
    type Output: Serialize + DeserializeOwned + Send + 'static;
}

/// Input validation beyond what serde's shape checking provides.
///
/// Rules live on the input type itself so the server registry can enforce
/// validate-before-dispatch uniformly, and clients can pre-flight the same
/// rules without a round trip.
pub trait ValidateInput {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulated validation failures for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Return `Ok(())` when no violations were recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for v in &self.violations {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Input for procedures that take no arguments (e.g. `game.list`).
///
/// An explicit empty object on the wire; unknown fields are rejected so a
/// caller cannot smuggle parameters into a parameterless call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoInput {}

impl ValidateInput for NoInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_rejects_unknown_fields() {
        let err = serde_json::from_str::<NoInput>(r#"{"limit": 10}"#);
        assert!(err.is_err());
    }

    #[test]
    fn validation_errors_display_joins_violations() {
        let mut errs = ValidationErrors::new();
        errs.push("name", "must not be empty");
        errs.push("maxPlayers", "must be >= minPlayers");
        assert_eq!(
            errs.to_string(),
            "name: must not be empty; maxPlayers: must be >= minPlayers"
        );
    }

    #[test]
    fn empty_validation_errors_resolve_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
