//! SQLite backend for the café roster.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every multi-step operation runs
//! inside one `IMMEDIATE` transaction on that thread, and a partial unique
//! index enforces one active assignment per employee.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
