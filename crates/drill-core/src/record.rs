//! The schedule record — one tracked item's spaced-repetition state — and the
//! collection every backend loads and saves as a whole.
//!
//! Field names on the wire follow the long-standing store layout (`ef`,
//! `reps`, `interval`); the descriptive names are accepted as aliases.
//! Missing fields are filled in here, at parse time, so the engine never has
//! to guess.

use std::{collections::BTreeMap, ops::RangeInclusive};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Lower bound on the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Centre of the difficulty scale; ratings above it start with a lower ease
/// factor, ratings below it with a higher one.
pub const DEFAULT_DIFFICULTY: i32 = 3;

pub const DEFAULT_INTERVAL_DAYS: u32 = 3;

/// The difficulty scale the ease-factor formulas are tuned for. The engine
/// accepts any integer; front ends validate against this range.
pub const DIFFICULTY_RANGE: RangeInclusive<i32> = 1..=5;

// ─── ScheduleRecord ──────────────────────────────────────────────────────────

/// Spaced-repetition state for one study item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
  /// Primary key; never changes once assigned.
  #[serde(default)]
  pub id:            String,
  #[serde(default = "default_difficulty")]
  pub difficulty:    i32,
  #[serde(rename = "ef", alias = "ease_factor", default = "default_ease_factor")]
  pub ease_factor:   f64,
  /// Consecutive successful reviews since creation or the last lapse.
  #[serde(rename = "reps", alias = "repetitions", default)]
  pub repetitions:   u32,
  #[serde(
    rename = "interval",
    alias = "interval_days",
    default = "default_interval_days"
  )]
  pub interval_days: u32,
  #[serde(default, with = "crate::date::optional")]
  pub last_review:   Option<NaiveDate>,
  /// Always set by the engine; may be missing on records imported from an
  /// older store, in which case the record is treated as due now.
  #[serde(default, with = "crate::date::optional")]
  pub next_review:   Option<NaiveDate>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub notes:         String,
}

fn default_difficulty() -> i32 { DEFAULT_DIFFICULTY }

fn default_ease_factor() -> f64 { DEFAULT_EASE_FACTOR }

fn default_interval_days() -> u32 { DEFAULT_INTERVAL_DAYS }

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ScheduleRecord {
  /// A record with every scheduling field at its default value.
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id:            id.into(),
      difficulty:    DEFAULT_DIFFICULTY,
      ease_factor:   DEFAULT_EASE_FACTOR,
      repetitions:   0,
      interval_days: DEFAULT_INTERVAL_DAYS,
      last_review:   None,
      next_review:   None,
      notes:         String::new(),
    }
  }

  /// The date used for ordering: the scheduled date, or `reference` when
  /// none is stored.
  pub fn due_on(&self, reference: NaiveDate) -> NaiveDate {
    self.next_review.unwrap_or(reference)
  }

  /// Whether the record should be reviewed on `reference`.
  pub fn is_due(&self, reference: NaiveDate) -> bool {
    self.next_review.is_none_or(|next| next <= reference)
  }
}

// ─── Collection ──────────────────────────────────────────────────────────────

/// Every tracked record, keyed by id.
///
/// Backed by a `BTreeMap` so that saves are deterministic; queries never rely
/// on storage order and sort explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
  records: BTreeMap<String, ScheduleRecord>,
}

impl Collection {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, id: &str) -> Option<&ScheduleRecord> { self.records.get(id) }

  pub fn contains(&self, id: &str) -> bool { self.records.contains_key(id) }

  /// Insert or replace the record stored under `record.id`, returning the
  /// previous value.
  pub fn upsert(&mut self, record: ScheduleRecord) -> Option<ScheduleRecord> {
    self.records.insert(record.id.clone(), record)
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &ScheduleRecord> + '_ {
    self.records.values()
  }
}

impl FromIterator<ScheduleRecord> for Collection {
  fn from_iter<I: IntoIterator<Item = ScheduleRecord>>(iter: I) -> Self {
    let mut collection = Self::new();
    for record in iter {
      collection.upsert(record);
    }
    collection
  }
}

impl IntoIterator for Collection {
  type Item = ScheduleRecord;
  type IntoIter = std::collections::btree_map::IntoValues<String, ScheduleRecord>;

  fn into_iter(self) -> Self::IntoIter { self.records.into_values() }
}

impl<'a> IntoIterator for &'a Collection {
  type Item = &'a ScheduleRecord;
  type IntoIter = std::collections::btree_map::Values<'a, String, ScheduleRecord>;

  fn into_iter(self) -> Self::IntoIter { self.records.values() }
}
