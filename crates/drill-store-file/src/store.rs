//! [`FileStore`] — the JSON file implementation of [`Repository`].

use std::{
  collections::BTreeMap,
  ffi::OsString,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use drill_core::{
  record::{Collection, ScheduleRecord},
  store::Repository,
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── On-disk layout ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Document {
  #[serde(default)]
  problems: BTreeMap<String, ScheduleRecord>,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
  problems: &'a Collection,
}

impl Document {
  /// The map key is authoritative; an entry with a missing or different `id`
  /// takes its key.
  fn into_collection(self) -> Collection {
    self
      .problems
      .into_iter()
      .map(|(key, mut record)| {
        record.id = key;
        record
      })
      .collect()
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A collection persisted as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
  path: PathBuf,
}

impl FileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  fn io_error(&self, source: std::io::Error) -> Error {
    Error::Io { path: self.path.clone(), source }
  }

  fn json_error(&self, source: serde_json::Error) -> Error {
    Error::Json { path: self.path.clone(), source }
  }

  /// Sibling path the new contents are written to before being renamed over
  /// the store file.
  fn staging_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(OsString::from)
      .unwrap_or_else(|| OsString::from("drill"));
    name.push(".tmp");
    self.path.with_file_name(name)
  }
}

impl Repository for FileStore {
  type Error = Error;

  async fn load(&self) -> Result<Collection> {
    let raw = match tokio::fs::read(&self.path).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::debug!(path = %self.path.display(), "store file missing, starting empty");
        return Ok(Collection::new());
      }
      Err(e) => return Err(self.io_error(e)),
    };

    let document: Document =
      serde_json::from_slice(&raw).map_err(|e| self.json_error(e))?;
    let collection = document.into_collection();

    tracing::debug!(
      path = %self.path.display(),
      records = collection.len(),
      "loaded store file"
    );
    Ok(collection)
  }

  async fn save(&self, collection: &Collection) -> Result<()> {
    let body = serde_json::to_vec_pretty(&DocumentRef { problems: collection })
      .map_err(|e| self.json_error(e))?;

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| self.io_error(e))?;
    }

    let staging = self.staging_path();
    tokio::fs::write(&staging, body)
      .await
      .map_err(|e| self.io_error(e))?;
    tokio::fs::rename(&staging, &self.path)
      .await
      .map_err(|e| self.io_error(e))?;

    tracing::debug!(
      path = %self.path.display(),
      records = collection.len(),
      "saved store file"
    );
    Ok(())
  }
}
