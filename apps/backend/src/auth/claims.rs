use serde::{Deserialize, Serialize};

/// Verified claims deposited in request extensions by the JwtExtract
/// middleware. This is the identity the core trusts; it never authenticates
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendClaims {
    /// External user identifier (users.sub)
    pub sub: String,
    pub email: String,
}
