//! `jobboard`: command-line front end for the job board.
//!
//! # Usage
//!
//! ```
//! jobboard jobs list --search rust --open-only
//! jobboard apply 5eed0000-0000-4000-8000-000000000001 --email ada@example.com
//! jobboard --config ~/.config/jobboard.toml stats
//! ```
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use jobboard_core::JobBoard;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{commands::Command, config::CliConfig};

#[derive(Parser)]
#[command(name = "jobboard", version, about = "Alumni job board")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "jobboard.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let cfg = CliConfig::load(&cli.config)?;
  let store = cfg.open_store()?;
  let mut board =
    JobBoard::open(store, cfg.board_options()).context("failed to load job board")?;

  let output = commands::execute(&mut board, cli.command)?;
  println!(
    "{}",
    serde_json::to_string_pretty(&output).context("failed to render output")?
  );

  Ok(())
}
