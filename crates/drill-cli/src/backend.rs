//! Runtime backend selection.
//!
//! [`Repository`] returns `impl Future`, so it cannot be used as a trait
//! object; [`Store`] dispatches over the concrete backends instead.

use anyhow::Context as _;
use chrono::NaiveDate;
use drill_core::{record::Collection, store::Repository};
use drill_store_file::FileStore;
use drill_store_sheets::SheetsStore;
use drill_store_sqlite::SqliteStore;
use thiserror::Error;

use crate::settings::{BackendKind, Settings};

pub enum Store {
  File(FileStore),
  Sqlite(SqliteStore),
  Sheets(SheetsStore),
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error(transparent)]
  File(#[from] drill_store_file::Error),
  #[error(transparent)]
  Sqlite(#[from] drill_store_sqlite::Error),
  #[error(transparent)]
  Sheets(#[from] drill_store_sheets::Error),
}

impl Store {
  pub fn kind(&self) -> BackendKind {
    match self {
      Self::File(_) => BackendKind::File,
      Self::Sqlite(_) => BackendKind::Sqlite,
      Self::Sheets(_) => BackendKind::Sheets,
    }
  }
}

impl Repository for Store {
  type Error = StoreError;

  async fn load(&self) -> Result<Collection, StoreError> {
    Ok(match self {
      Self::File(s) => s.load().await?,
      Self::Sqlite(s) => s.load().await?,
      Self::Sheets(s) => s.load().await?,
    })
  }

  async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
    match self {
      Self::File(s) => s.save(collection).await?,
      Self::Sqlite(s) => s.save(collection).await?,
      Self::Sheets(s) => s.save(collection).await?,
    }
    Ok(())
  }
}

/// Open the backend named by `kind`.
///
/// `today` is handed to the sheets backend, which schedules rows with a
/// blank `next_review` relative to it.
pub async fn open(settings: &Settings, kind: BackendKind, today: NaiveDate) -> anyhow::Result<Store> {
  let file = || FileStore::new(settings.data_path.clone());

  let store = match kind {
    BackendKind::File => Store::File(file()),
    BackendKind::Sqlite => {
      let path = &settings.sqlite_path;
      let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("failed to open sqlite store at {}", path.display()))?;
      Store::Sqlite(store)
    }
    BackendKind::Sheets => {
      let cfg = settings
        .sheets
        .clone()
        .context("backend is \"sheets\" but no [sheets] section is configured")?;
      let id = cfg.spreadsheet_id.clone();
      match SheetsStore::connect(cfg, today).await {
        Ok(store) => {
          tracing::info!(spreadsheet = %id, "using google sheet");
          Store::Sheets(store)
        }
        Err(e) => {
          tracing::warn!(
            spreadsheet = %id,
            error = %e,
            fallback = %settings.data_path.display(),
            "could not connect to google sheet, falling back to local file"
          );
          Store::File(file())
        }
      }
    }
  };
  Ok(store)
}
