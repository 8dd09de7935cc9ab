//! Console output for each command. Everything returns a `String`; `main`
//! does the printing.

use std::fmt::Write as _;

use chrono::NaiveDate;
use drill_core::{date, due::PlanSummary, engine::Outcome, record::ScheduleRecord};

fn show(day: Option<NaiveDate>) -> String {
  day.map_or_else(|| "-".to_owned(), date::encode)
}

fn next(record: &ScheduleRecord) -> String { show(record.next_review) }

pub fn added(record: &ScheduleRecord, outcome: Outcome) -> String {
  match outcome {
    Outcome::Created => format!(
      "Added {} (difficulty {}). First review in {} days on {}",
      record.id,
      record.difficulty,
      record.interval_days,
      next(record)
    ),
    Outcome::Reset => format!(
      "Updated {}: next review in {} days on {}",
      record.id,
      record.interval_days,
      next(record)
    ),
  }
}

pub fn reviewed(record: &ScheduleRecord, quality: i32) -> String {
  format!(
    "{}: q={quality}, next={} (in {}d, ef={})",
    record.id,
    next(record),
    record.interval_days,
    record.ease_factor
  )
}

pub fn due(records: &[ScheduleRecord]) -> String {
  if records.is_empty() {
    return "Woohoo nothing due today!".to_owned();
  }
  let mut out = String::from("Due problems:");
  for r in records {
    let _ = write!(out, "\n{:10} | diff={} next={}", r.id, r.difficulty, next(r));
  }
  out
}

pub fn summary(plan: &PlanSummary, records: &[ScheduleRecord]) -> String {
  let mut out = format!(
    "Total tracked: {}\nDue today: {} (Overdue: {})\nTomorrow: {} | 2-7d: {} | 8-30d: {}",
    plan.total,
    plan.due_today,
    plan.overdue,
    plan.due_tomorrow,
    plan.next_7_days,
    plan.next_30_days,
  );
  for r in records {
    let _ = write!(
      out,
      "\n{:12} | diff={} ef={:.2} reps={} interval={}d next={} last={}",
      r.id,
      r.difficulty,
      r.ease_factor,
      r.repetitions,
      r.interval_days,
      next(r),
      show(r.last_review),
    );
  }
  out
}

pub fn plan(plan: &PlanSummary) -> String {
  let mut out = String::from("Study plan summary");
  for (label, count) in plan.rows() {
    let _ = write!(out, "\n{label:>15}: {count}");
  }
  out
}
