//! [`Tracker`] — one method per user command, over an injected repository.
//!
//! Every call loads the full collection, runs one engine operation or query,
//! and, for mutations, saves the full collection before returning. There is
//! no locking: a single writer is assumed.

use chrono::NaiveDate;

use crate::{
  Error, Result,
  due::{self, PlanSummary},
  engine::{self, Outcome},
  record::{Collection, ScheduleRecord},
  store::Repository,
};

pub struct Tracker<R> {
  repo: R,
}

impl<R: Repository> Tracker<R> {
  pub fn new(repo: R) -> Self { Self { repo } }

  pub fn repository(&self) -> &R { &self.repo }

  pub async fn load(&self) -> Result<Collection> {
    self.repo.load().await.map_err(Error::storage)
  }

  async fn save(&self, collection: &Collection) -> Result<()> {
    self.repo.save(collection).await.map_err(Error::storage)
  }

  /// Record that `id` was solved on `today`; see
  /// [`engine::create_or_reset`].
  pub async fn add_solved(
    &self,
    id:         &str,
    difficulty: i32,
    notes:      &str,
    today:      NaiveDate,
  ) -> Result<(ScheduleRecord, Outcome)> {
    let mut collection = self.load().await?;
    let result = engine::create_or_reset(&mut collection, id, difficulty, notes, today)?;
    self.save(&collection).await?;
    Ok(result)
  }

  /// Grade a review of `id`; see [`engine::record_review`]. Nothing is
  /// written when the review is rejected.
  pub async fn record_review(
    &self,
    id:      &str,
    quality: i32,
    today:   NaiveDate,
  ) -> Result<ScheduleRecord> {
    let mut collection = self.load().await?;
    let record = engine::record_review(&mut collection, id, quality, today)?;
    self.save(&collection).await?;
    Ok(record)
  }

  pub async fn due(&self, today: NaiveDate) -> Result<Vec<ScheduleRecord>> {
    Ok(due::due(&self.load().await?, today))
  }

  pub async fn plan(&self, today: NaiveDate) -> Result<PlanSummary> {
    Ok(due::plan_summary(&self.load().await?, today))
  }

  /// The plan counts together with every record in schedule order, from a
  /// single load.
  pub async fn summary(&self, today: NaiveDate) -> Result<(PlanSummary, Vec<ScheduleRecord>)> {
    let collection = self.load().await?;
    Ok((due::plan_summary(&collection, today), due::schedule(&collection, today)))
  }
}
