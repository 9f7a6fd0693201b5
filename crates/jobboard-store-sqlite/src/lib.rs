//! SQLite backend for the job board's key-value persistence.
//!
//! Each collection is one row in a `collections` table, keyed by name and
//! holding the collection's JSON text.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
