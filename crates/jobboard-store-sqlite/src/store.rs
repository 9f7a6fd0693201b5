//! [`SqliteStore`], the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use jobboard_core::kv::KeyValueStore;
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Job board collections held in a single SQLite file.
pub struct SqliteStore {
  conn: rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = rusqlite::Connection::open(path)?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  /// Open an in-memory store. Nothing survives the connection.
  pub fn open_in_memory() -> Result<Self> {
    let conn = rusqlite::Connection::open_in_memory()?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  /// Names of every stored collection, sorted.
  pub fn keys(&self) -> Result<Vec<String>> {
    let mut stmt = self
      .conn
      .prepare("SELECT key FROM collections ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }

  /// When `key` was last written, or `None` if it is absent.
  pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = self
      .conn
      .query_row(
        "SELECT updated_at FROM collections WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;
    raw.as_deref().map(decode_dt).transpose()
  }
}

impl KeyValueStore for SqliteStore {
  type Error = Error;

  fn load(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn
      .query_row(
        "SELECT value FROM collections WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn save(&mut self, key: &str, value: &str) -> Result<()> {
    self.conn.execute(
      "INSERT INTO collections (key, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT(key) DO UPDATE SET
         value      = excluded.value,
         updated_at = excluded.updated_at",
      rusqlite::params![key, value, encode_dt(Utc::now())],
    )?;
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<()> {
    self.conn.execute(
      "DELETE FROM collections WHERE key = ?1",
      rusqlite::params![key],
    )?;
    Ok(())
  }
}
