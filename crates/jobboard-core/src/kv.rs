//! The `KeyValueStore` trait and the in-memory backend.
//!
//! The trait is implemented by durable backends (e.g.
//! `jobboard-store-sqlite`). [`crate::JobBoard`] depends on this abstraction,
//! not on any concrete medium.

use std::{collections::BTreeMap, convert::Infallible};

// ─── Collection keys ─────────────────────────────────────────────────────────

pub const JOBS_KEY: &str = "jobs";
pub const APPLICATIONS_KEY: &str = "applications";
pub const FEEDBACKS_KEY: &str = "feedbacks";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A durable medium holding whole JSON-encoded collections by name.
///
/// Every `save` replaces the named collection in full. There is no
/// transaction spanning several keys.
pub trait KeyValueStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the stored text for `key`. Returns `None` if nothing was saved.
  fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Overwrite the value stored under `key`.
  fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

  /// Forget `key`. Removing an absent key is not an error.
  fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A store that lives only as long as the process. Used in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Borrow the stored text for `key` without going through the trait.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.entries.get(key).cloned())
  }

  fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
    self.entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
    self.entries.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn save_overwrites_and_remove_forgets() {
    let mut store = MemoryStore::new();
    store.save(JOBS_KEY, "[1]").unwrap();
    store.save(JOBS_KEY, "[2]").unwrap();
    assert_eq!(store.load(JOBS_KEY).unwrap().as_deref(), Some("[2]"));

    store.remove(JOBS_KEY).unwrap();
    assert_eq!(store.load(JOBS_KEY).unwrap(), None);
    store.remove(JOBS_KEY).unwrap();
  }
}
