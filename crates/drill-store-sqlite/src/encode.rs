//! Conversions between [`ScheduleRecord`] and the plain column values stored
//! in SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` text. Every column except `id` is
//! nullable; NULLs take the record defaults on the way out.

use drill_core::{
  date,
  record::{
    DEFAULT_DIFFICULTY, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL_DAYS, ScheduleRecord,
  },
};

use crate::{Error, Result};

pub const SELECT_COLUMNS: &str =
  "id, difficulty, ef, reps, interval, last_review, next_review, notes";

/// A row as read from the `records` table, before validation.
#[derive(Debug, Clone)]
pub struct RawRecord {
  pub id:          String,
  pub difficulty:  Option<i64>,
  pub ef:          Option<f64>,
  pub reps:        Option<i64>,
  pub interval:    Option<i64>,
  pub last_review: Option<String>,
  pub next_review: Option<String>,
  pub notes:       Option<String>,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      difficulty:  row.get(1)?,
      ef:          row.get(2)?,
      reps:        row.get(3)?,
      interval:    row.get(4)?,
      last_review: row.get(5)?,
      next_review: row.get(6)?,
      notes:       row.get(7)?,
    })
  }

  pub fn from_record(record: &ScheduleRecord) -> Self {
    Self {
      id:          record.id.clone(),
      difficulty:  Some(i64::from(record.difficulty)),
      ef:          Some(record.ease_factor),
      reps:        Some(i64::from(record.repetitions)),
      interval:    Some(i64::from(record.interval_days)),
      last_review: record.last_review.map(date::encode),
      next_review: record.next_review.map(date::encode),
      notes:       Some(record.notes.clone()),
    }
  }

  pub fn into_record(self) -> Result<ScheduleRecord> {
    let difficulty = self.int_column("difficulty", self.difficulty, DEFAULT_DIFFICULTY)?;
    let repetitions = self.int_column("reps", self.reps, 0)?;
    let interval_days = self.int_column("interval", self.interval, DEFAULT_INTERVAL_DAYS)?;
    let last_review = self.date_column("last_review", self.last_review.as_deref())?;
    let next_review = self.date_column("next_review", self.next_review.as_deref())?;

    Ok(ScheduleRecord {
      id: self.id,
      difficulty,
      ease_factor: self.ef.unwrap_or(DEFAULT_EASE_FACTOR),
      repetitions,
      interval_days,
      last_review,
      next_review,
      notes: self.notes.unwrap_or_default(),
    })
  }

  fn int_column<T: TryFrom<i64>>(
    &self,
    column:  &'static str,
    value:   Option<i64>,
    default: T,
  ) -> Result<T> {
    match value {
      None => Ok(default),
      Some(v) => T::try_from(v).map_err(|_| Error::InvalidRow {
        id:     self.id.clone(),
        reason: format!("{column} out of range: {v}"),
      }),
    }
  }

  fn date_column(
    &self,
    column: &'static str,
    value:  Option<&str>,
  ) -> Result<Option<chrono::NaiveDate>> {
    let Some(raw) = value else { return Ok(None) };
    date::parse_optional(raw).map_err(|_| Error::DateParse {
      id: self.id.clone(),
      column,
      value: raw.to_owned(),
    })
  }
}
