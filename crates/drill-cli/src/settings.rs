//! Layered configuration: an optional TOML file, then `DRILL_*` environment
//! variables (`__` separates nested keys, e.g. `DRILL_SHEETS__ACCESS_TOKEN`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use drill_store_sheets::SheetsConfig;
use serde::Deserialize;

/// Which repository backs the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
  /// A JSON file (`data_path`).
  #[default]
  File,
  /// A SQLite database (`sqlite_path`).
  Sqlite,
  /// A Google Sheets worksheet (`[sheets]`), falling back to the JSON file
  /// when the spreadsheet cannot be reached.
  Sheets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub backend:     BackendKind,
  #[serde(default = "default_data_path")]
  pub data_path:   PathBuf,
  #[serde(default = "default_sqlite_path")]
  pub sqlite_path: PathBuf,
  #[serde(default)]
  pub sheets:      Option<SheetsConfig>,
}

fn default_data_path() -> PathBuf { PathBuf::from("leet_srs.json") }

fn default_sqlite_path() -> PathBuf { PathBuf::from("drill.sqlite3") }

impl Settings {
  /// Read `path` (if it exists) and overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let mut settings: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("DRILL")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.data_path = expand_tilde(&settings.data_path);
    settings.sqlite_path = expand_tilde(&settings.sqlite_path);
    Ok(settings)
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
