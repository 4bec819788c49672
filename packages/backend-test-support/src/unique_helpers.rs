//! Test helpers for generating unique test data
//!
//! ULID-based so parallel tests and repeated runs never collide.

use ulid::Ulid;

/// Generate a unique string with the given prefix.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique auth subject for seeding users.
pub fn unique_sub(prefix: &str) -> String {
    format!("auth0|{}", unique_str(prefix))
}

/// Generate a unique email address with the given prefix.
pub fn unique_email(prefix: &str) -> String {
    format!("{}@example.test", unique_str(prefix).to_lowercase())
}
