//! Runtime configuration, layered from an optional TOML file and
//! `JOBBOARD_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use jobboard_core::{BoardOptions, FeedbackPolicy};
use jobboard_store_sqlite::SqliteStore;
use serde::Deserialize;

/// Store path that selects a throwaway in-memory database.
const IN_MEMORY: &str = ":memory:";

fn default_store_path() -> PathBuf { PathBuf::from("jobboard.db") }

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// SQLite database file. `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  #[serde(default)]
  pub feedback_policy: FeedbackPolicy,
}

impl CliConfig {
  /// Read `path` (if it exists), then apply environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("JOBBOARD"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn board_options(&self) -> BoardOptions {
    BoardOptions {
      feedback_policy: self.feedback_policy,
    }
  }

  /// Open the configured SQLite store, creating its directory if needed.
  pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
    if self.store_path == Path::new(IN_MEMORY) {
      return SqliteStore::open_in_memory().context("failed to open in-memory store");
    }

    if let Some(parent) = self.store_path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    SqliteStore::open(&self.store_path)
      .with_context(|| format!("failed to open store at {:?}", self.store_path))
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
