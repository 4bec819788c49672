//! Shared wire contract between the tablescore backend and its clients.
//!
//! Every remote operation is described once, here, as a [`Procedure`]: a wire
//! name plus statically typed input and output shapes. The server registry and
//! the client both consume these marker types, so the two sides cannot drift.
//!
//! This crate is HTTP- and database-agnostic: no actix, no SeaORM.

pub mod error;
pub mod games;
pub mod matches;
pub mod players;
pub mod procedure;
pub mod refs;
pub mod scoresheets;
pub mod stats;

pub use error::{ErrorKind, RpcError};
pub use procedure::{FieldViolation, NoInput, Procedure, ValidateInput, ValidationErrors};
pub use refs::{GameRef, PlayerRef, SharePermission};
