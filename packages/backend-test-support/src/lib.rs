//! Backend test support utilities
//!
//! This crate provides utilities specifically for backend testing: unified
//! logging initialization, unique test-data helpers, and problem-details
//! assertions that do not depend on backend types.

pub mod problem_details;
pub mod test_logging;
pub mod unique_helpers;
