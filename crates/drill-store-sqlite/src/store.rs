//! [`SqliteStore`] — the SQLite implementation of [`Repository`].

use std::path::Path;

use drill_core::{record::Collection, store::Repository};

use crate::{
  Result,
  encode::{RawRecord, SELECT_COLUMNS},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A drill collection backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Repository for SqliteStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Collection> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM records"))?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let collection = raws
      .into_iter()
      .filter(|raw| !raw.id.trim().is_empty())
      .map(RawRecord::into_record)
      .collect::<Result<Collection>>()?;

    tracing::debug!(records = collection.len(), "loaded sqlite store");
    Ok(collection)
  }

  async fn save(&self, collection: &Collection) -> Result<()> {
    let rows: Vec<RawRecord> = collection.iter().map(RawRecord::from_record).collect();
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM records", [])?;
        {
          let mut insert = tx.prepare(&format!(
            "INSERT INTO records ({SELECT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
          ))?;
          for row in &rows {
            insert.execute(rusqlite::params![
              row.id,
              row.difficulty,
              row.ef,
              row.reps,
              row.interval,
              row.last_review,
              row.next_review,
              row.notes,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(records = count, "saved sqlite store");
    Ok(())
  }
}
