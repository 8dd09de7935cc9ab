//! SM-2 style scheduling rules.
//!
//! Two events change a record: solving an item for the first time (or again,
//! which resets its streak), and grading a review with a quality rating:
//!
//! - 0–2: lapse; the streak restarts and the item comes back in three days
//! - 3–5: success; the interval grows by the ease factor
//!
//! The ease factor is adjusted on every review and never drops below
//! [`MIN_EASE_FACTOR`]. Both operations compute the new record from a copy,
//! so a failed call leaves the collection untouched.

use chrono::NaiveDate;

use crate::{
  Error, Result, date,
  record::{Collection, DEFAULT_DIFFICULTY, MIN_EASE_FACTOR, ScheduleRecord},
};

/// Interval after a first solve, a reset, or a lapse.
pub const RESTART_INTERVAL_DAYS: u32 = 3;

/// Interval after the first successful review in a streak.
pub const FIRST_SUCCESS_INTERVAL_DAYS: u32 = 10;

const BASE_EASE_FACTOR: f64 = 2.5;
const CREATE_DIFFICULTY_WEIGHT: f64 = 0.05;
const RESET_DIFFICULTY_WEIGHT: f64 = 0.02;

// ─── Quality ─────────────────────────────────────────────────────────────────

/// A review grade in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
  pub const MAX: u8 = 5;

  /// Lowest grade that counts as a successful recall.
  pub const PASS: u8 = 3;

  pub fn new(raw: i32) -> Result<Self> {
    u8::try_from(raw)
      .ok()
      .filter(|q| *q <= Self::MAX)
      .map(Self)
      .ok_or_else(|| {
        Error::InvalidArgument(format!("quality must be 0-{}, got {raw}", Self::MAX))
      })
  }

  pub fn value(self) -> u8 { self.0 }

  pub fn is_success(self) -> bool { self.0 >= Self::PASS }
}

// ─── Formulas ────────────────────────────────────────────────────────────────

/// Round to three decimal places, the precision ease factors are stored at.
fn round_ef(value: f64) -> f64 { (value * 1000.0).round() / 1000.0 }

fn difficulty_offset(difficulty: i32) -> f64 {
  f64::from(difficulty) - f64::from(DEFAULT_DIFFICULTY)
}

/// Starting ease factor for a newly solved item.
pub fn initial_ease_factor(difficulty: i32) -> f64 {
  round_ef(
    (BASE_EASE_FACTOR - CREATE_DIFFICULTY_WEIGHT * difficulty_offset(difficulty))
      .max(MIN_EASE_FACTOR),
  )
}

/// Ease factor after re-solving an item that is already tracked.
pub fn reset_ease_factor(current: f64, difficulty: i32) -> f64 {
  round_ef(current - RESET_DIFFICULTY_WEIGHT * difficulty_offset(difficulty))
    .max(MIN_EASE_FACTOR)
}

/// The SM-2 ease adjustment: +0.1 for a perfect recall, falling to -0.8 for
/// a blackout, floored at [`MIN_EASE_FACTOR`].
pub fn adjusted_ease_factor(current: f64, quality: Quality) -> f64 {
  let miss = f64::from(Quality::MAX - quality.value());
  round_ef((current + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR))
}

/// Interval for a successful review that brings the streak to `repetitions`.
///
/// Ties round half to even (`2.5 → 2`, `3.5 → 4`).
pub fn success_interval(repetitions: u32, previous_interval: u32, ease_factor: f64) -> u32 {
  if repetitions == 1 {
    return FIRST_SUCCESS_INTERVAL_DAYS;
  }
  let grown = (f64::from(previous_interval) * ease_factor).round_ties_even();
  // Float-to-int casts saturate.
  grown.max(1.0) as u32
}

// ─── Pure transitions ────────────────────────────────────────────────────────

/// The state of `record` after a graded review on `today`.
pub fn reviewed(record: &ScheduleRecord, quality: Quality, today: NaiveDate) -> ScheduleRecord {
  let (repetitions, interval_days) = if quality.is_success() {
    let repetitions = record.repetitions.saturating_add(1);
    (
      repetitions,
      success_interval(repetitions, record.interval_days, record.ease_factor),
    )
  } else {
    (0, RESTART_INTERVAL_DAYS)
  };

  ScheduleRecord {
    ease_factor: adjusted_ease_factor(record.ease_factor, quality),
    repetitions,
    interval_days,
    last_review: Some(today),
    next_review: Some(date::add_days(today, interval_days)),
    ..record.clone()
  }
}

/// The state of `record` after it is solved again on `today`.
pub fn reset(record: &ScheduleRecord, difficulty: i32, notes: &str, today: NaiveDate) -> ScheduleRecord {
  ScheduleRecord {
    difficulty,
    ease_factor: reset_ease_factor(record.ease_factor, difficulty),
    repetitions: 0,
    interval_days: RESTART_INTERVAL_DAYS,
    next_review: Some(date::add_days(today, RESTART_INTERVAL_DAYS)),
    notes: if notes.is_empty() { record.notes.clone() } else { notes.to_owned() },
    ..record.clone()
  }
}

/// A freshly solved item.
pub fn created(id: &str, difficulty: i32, notes: &str, today: NaiveDate) -> ScheduleRecord {
  ScheduleRecord {
    difficulty,
    ease_factor: initial_ease_factor(difficulty),
    repetitions: 0,
    interval_days: RESTART_INTERVAL_DAYS,
    last_review: None,
    next_review: Some(date::add_days(today, RESTART_INTERVAL_DAYS)),
    notes: notes.to_owned(),
    ..ScheduleRecord::new(id)
  }
}

// ─── Collection operations ───────────────────────────────────────────────────

/// Whether [`create_or_reset`] added a record or reset an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Created,
  Reset,
}

/// The key `id` refers to: an exact match when one is stored, otherwise the
/// id with surrounding whitespace removed.
fn resolve_id<'a>(collection: &Collection, id: &'a str) -> &'a str {
  if collection.contains(id) { id } else { id.trim() }
}

/// Record that the item `id` was solved on `today`.
///
/// Unknown ids get a new record; known ids have their streak and interval
/// reset. Notes on an existing record are only replaced by non-empty notes.
pub fn create_or_reset(
  collection: &mut Collection,
  id:         &str,
  difficulty: i32,
  notes:      &str,
  today:      NaiveDate,
) -> Result<(ScheduleRecord, Outcome)> {
  let id = resolve_id(collection, id);
  if id.trim().is_empty() {
    return Err(Error::InvalidArgument("id must not be empty".into()));
  }

  let (record, outcome) = match collection.get(id) {
    Some(existing) => (reset(existing, difficulty, notes, today), Outcome::Reset),
    None => (created(id, difficulty, notes, today), Outcome::Created),
  };

  collection.upsert(record.clone());
  Ok((record, outcome))
}

/// Record a graded review of `id` on `today`.
///
/// Fails with [`Error::NotFound`] for an unknown id and
/// [`Error::InvalidArgument`] for a quality outside `0..=5`.
pub fn record_review(
  collection: &mut Collection,
  id:         &str,
  quality:    i32,
  today:      NaiveDate,
) -> Result<ScheduleRecord> {
  let id = resolve_id(collection, id);
  let existing = collection
    .get(id)
    .ok_or_else(|| Error::NotFound(format!("{id} not found")))?;
  let quality = Quality::new(quality)?;

  let record = reviewed(existing, quality, today);
  collection.upsert(record.clone());
  Ok(record)
}
