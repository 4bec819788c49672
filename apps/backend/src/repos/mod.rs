//! Repository layer: one logical read or write per function, each taking a
//! typed argument object plus the acting user's id. No query construction
//! happens outside this layer, and no function offers an unscoped read path.

pub mod games;
pub mod matches;
pub mod players;
pub mod scoresheets;
pub mod shares;
pub mod stats;
pub mod users;
