use std::env;

use crate::error::AppError;

/// Database profile enum for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// Production database profile
    Prod,
    /// Test database profile - enforces safety rules
    Test,
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Builds a database URL from environment variables based on profile and owner.
///
/// The test profile prefers an explicit `TEST_DB` Postgres database (name must
/// end with `_test`); without one it falls back to SQLite in-memory so the
/// test suite is self-contained.
pub fn db_url(profile: DbProfile, owner: DbOwner) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => {
            let db_name = must_var("PROD_DB")?;
            postgres_url(&db_name, owner)
        }
        DbProfile::Test => match env::var("TEST_DB") {
            Ok(db_name) => {
                // Enforce safety: test DB must end with "_test"
                if !db_name.ends_with("_test") {
                    return Err(AppError::config(format!(
                        "Test profile requires database name to end with '_test', but got: '{db_name}'"
                    )));
                }
                postgres_url(&db_name, owner)
            }
            Err(_) => Ok("sqlite::memory:".to_string()),
        },
    }
}

fn postgres_url(db_name: &str, owner: DbOwner) -> Result<String, AppError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let (username, password) = credentials(owner)?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

/// Get database credentials based on owner
fn credentials(owner: DbOwner) -> Result<(String, String), AppError> {
    match owner {
        DbOwner::App => {
            let username = must_var("APP_DB_USER")?;
            let password = must_var("APP_DB_PASSWORD")?;
            Ok((username, password))
        }
        DbOwner::Owner => {
            let username = must_var("TABLESCORE_OWNER_USER")?;
            let password = must_var("TABLESCORE_OWNER_PASSWORD")?;
            Ok((username, password))
        }
    }
}

/// Get required environment variable or return a config error naming it.
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::config(format!("required env var {name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_profile_without_test_db_falls_back_to_sqlite() {
        std::env::remove_var("TEST_DB");
        let url = db_url(DbProfile::Test, DbOwner::App).unwrap();
        assert_eq!(url, "sqlite::memory:");
    }

    #[test]
    #[serial_test::serial]
    fn test_profile_rejects_db_name_without_test_suffix() {
        std::env::set_var("TEST_DB", "tablescore_prod");
        let result = db_url(DbProfile::Test, DbOwner::App);
        std::env::remove_var("TEST_DB");
        assert!(result.is_err());
    }
}
