//! The `Repository` trait — the load/save contract every backend fulfils.
//!
//! Backends live in their own crates (`drill-store-file`,
//! `drill-store-sqlite`, `drill-store-sheets`). The engine never sees them;
//! the [`crate::tracker::Tracker`] moves whole collections in and out.

use std::{
  convert::Infallible,
  future::Future,
  sync::{Mutex, PoisonError},
};

use crate::record::Collection;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Whole-collection persistence.
///
/// Implementations must round-trip a [`Collection`] faithfully and fill in
/// missing fields with the defaults documented on
/// [`ScheduleRecord`](crate::record::ScheduleRecord) while parsing. No
/// ordering of records is implied.
///
/// All methods return `Send` futures so the trait can be driven from a
/// multi-threaded tokio runtime.
pub trait Repository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every stored record.
  fn load(&self) -> impl Future<Output = Result<Collection, Self::Error>> + Send + '_;

  /// Replace the stored records with `collection`.
  fn save<'a>(
    &'a self,
    collection: &'a Collection,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// A repository that keeps the collection in process memory. Useful for
/// tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryRepository {
  collection: Mutex<Collection>,
}

impl MemoryRepository {
  pub fn new(collection: Collection) -> Self {
    Self { collection: Mutex::new(collection) }
  }

  /// A copy of the currently stored collection.
  pub fn snapshot(&self) -> Collection {
    self
      .collection
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }
}

impl Repository for MemoryRepository {
  type Error = Infallible;

  async fn load(&self) -> Result<Collection, Infallible> { Ok(self.snapshot()) }

  async fn save(&self, collection: &Collection) -> Result<(), Infallible> {
    *self
      .collection
      .lock()
      .unwrap_or_else(PoisonError::into_inner) = collection.clone();
    Ok(())
  }
}
