//! Typed client for the tablescore RPC API.
//!
//! Calls go through the same [`contract::Procedure`] markers the server
//! registers, so the two sides share one statically checked contract. Reads
//! are served through a keyed, reference-counted request cache: concurrent
//! identical calls coalesce onto one in-flight request, and abandoning the
//! last waiter cancels the flight without polluting the cache.

pub mod cache;
pub mod client;
pub mod error;
pub mod queries;
pub mod transport;

pub use client::RpcClient;
pub use error::ClientError;
pub use transport::{HttpTransport, Transport};
