//! Client-side error taxonomy.
//!
//! Mirrors the failure semantics the views depend on: transport and server
//! infra failures are retryable; validation failures are not (retrying would
//! resend the same invalid input); a narrowed `null` is its own kind so call
//! sites can render "missing" differently from "broken".

use contract::{RpcError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Structured error reported by the server.
    #[error("server error: {0}")]
    Rpc(RpcError),
    /// Input failed local validation; the request was never sent.
    #[error("invalid input: {0}")]
    InvalidInput(ValidationErrors),
    /// The transport failed before a structured server response existed.
    #[error("transport error: {detail}")]
    Transport { detail: String },
    /// The server answered but the payload did not match the declared shape.
    #[error("decode error for {procedure}: {detail}")]
    Decode {
        procedure: &'static str,
        detail: String,
    },
    /// A call site required data the server reported absent (`null`).
    #[error("{procedure} returned no data for a required input")]
    MissingData { procedure: &'static str },
}

impl ClientError {
    /// Whether re-issuing the identical request may plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Rpc(e) => e.is_retryable(),
            ClientError::Transport { .. } => true,
            ClientError::InvalidInput(_)
            | ClientError::Decode { .. }
            | ClientError::MissingData { .. } => false,
        }
    }
}

impl From<RpcError> for ClientError {
    fn from(e: RpcError) -> Self {
        ClientError::Rpc(e)
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(e: ValidationErrors) -> Self {
        ClientError::InvalidInput(e)
    }
}
