//! `drill` — spaced-repetition review tracker for practice problems.
//!
//! # Usage
//!
//! ```
//! drill add two-sum 2 "hash map, one pass"
//! drill review two-sum 4
//! drill due
//! drill --backend sqlite summary
//! drill --config ~/.config/drill/drill.toml plan
//! ```

mod backend;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use drill_core::{record::DIFFICULTY_RANGE, store::Repository, tracker::Tracker};
use settings::{BackendKind, Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "drill", version, about = "Spaced-repetition review tracker")]
struct Cli {
  /// Path to a TOML config file; missing files are ignored.
  #[arg(short, long, value_name = "FILE", env = "DRILL_CONFIG", default_value = "drill.toml")]
  config: PathBuf,

  /// Storage backend, overriding the config file.
  #[arg(long, value_enum)]
  backend: Option<BackendKind>,

  /// Treat this date as today.
  #[arg(long, value_name = "YYYY-MM-DD")]
  today: Option<NaiveDate>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a solved problem: adds it, or resets its schedule if tracked.
  Add {
    id:         String,
    /// Difficulty, 1 (easy) to 5 (hard).
    #[arg(value_parser = parse_difficulty)]
    difficulty: i32,
    #[arg(default_value = "")]
    notes:      String,
  },
  /// Grade a review: 0-2 forgot, 3-5 recalled.
  Review {
    id:      String,
    #[arg(allow_negative_numbers = true)]
    quality: i32,
  },
  /// List problems due today, hardest first within a day.
  Due,
  /// Workload counts followed by every tracked problem.
  Summary,
  /// Workload counts only.
  Plan,
}

fn parse_difficulty(raw: &str) -> Result<i32, String> {
  let value: i32 = raw.parse().map_err(|_| format!("{raw:?} is not a number"))?;
  if DIFFICULTY_RANGE.contains(&value) {
    Ok(value)
  } else {
    Err(format!(
      "difficulty must be between {} and {}",
      DIFFICULTY_RANGE.start(),
      DIFFICULTY_RANGE.end()
    ))
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Diagnostics go to stderr so command output stays pipeable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
  let kind = cli.backend.unwrap_or(settings.backend);

  let store = backend::open(&settings, kind, today).await?;
  tracing::debug!(backend = ?store.kind(), %today, "store opened");

  let tracker = Tracker::new(store);
  println!("{}", run(&tracker, cli.command, today).await?);
  Ok(())
}

/// Execute one command and return its console output.
async fn run<R: Repository>(tracker: &Tracker<R>, command: Command, today: NaiveDate) -> Result<String> {
  let output = match command {
    Command::Add { id, difficulty, notes } => {
      let (record, outcome) = tracker.add_solved(&id, difficulty, &notes, today).await?;
      render::added(&record, outcome)
    }
    Command::Review { id, quality } => {
      let record = tracker.record_review(&id, quality, today).await?;
      render::reviewed(&record, quality)
    }
    Command::Due => render::due(&tracker.due(today).await?),
    Command::Summary => {
      let (plan, records) = tracker.summary(today).await?;
      render::summary(&plan, &records)
    }
    Command::Plan => render::plan(&tracker.plan(today).await?),
  };
  Ok(output)
}
