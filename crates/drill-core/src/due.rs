//! Read-only queries over a collection: what is due, and how the workload is
//! spread over the coming month.
//!
//! None of these functions mutate the collection. Each returns an owned
//! snapshot; call again for a fresh one.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  date,
  record::{Collection, ScheduleRecord},
};

/// Records due on `reference`, soonest first.
///
/// A record without a scheduled date counts as due on `reference`. Among
/// records due the same day, harder items come first; id breaks any
/// remaining tie so the order is stable.
pub fn due(collection: &Collection, reference: NaiveDate) -> Vec<ScheduleRecord> {
  let mut due: Vec<ScheduleRecord> = collection
    .iter()
    .filter(|r| r.is_due(reference))
    .cloned()
    .collect();
  due.sort_by(|a, b| {
    (a.due_on(reference), Reverse(a.difficulty), &a.id)
      .cmp(&(b.due_on(reference), Reverse(b.difficulty), &b.id))
  });
  due
}

/// Every record, ordered by scheduled date then id.
pub fn schedule(collection: &Collection, reference: NaiveDate) -> Vec<ScheduleRecord> {
  let mut all: Vec<ScheduleRecord> = collection.iter().cloned().collect();
  all.sort_by(|a, b| (a.due_on(reference), &a.id).cmp(&(b.due_on(reference), &b.id)));
  all
}

// ─── Plan summary ────────────────────────────────────────────────────────────

/// Workload counts relative to a reference date.
///
/// Overdue records are counted in both `overdue` and `due_today`. Records
/// without a scheduled date count toward `due_today` and `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
  pub overdue:      usize,
  pub due_today:    usize,
  pub due_tomorrow: usize,
  /// Due in 2 to 7 days.
  pub next_7_days:  usize,
  /// Due in 8 to 30 days.
  pub next_30_days: usize,
  pub total:        usize,
}

impl PlanSummary {
  /// Label/count pairs in reporting order.
  pub fn rows(&self) -> [(&'static str, usize); 6] {
    [
      ("overdue", self.overdue),
      ("due_today", self.due_today),
      ("due_tomorrow", self.due_tomorrow),
      ("next_7_days", self.next_7_days),
      ("next_30_days", self.next_30_days),
      ("total", self.total),
    ]
  }
}

pub fn plan_summary(collection: &Collection, reference: NaiveDate) -> PlanSummary {
  let tomorrow = date::add_days(reference, 1);
  let week = date::add_days(reference, 7);
  let month = date::add_days(reference, 30);

  let mut summary = PlanSummary::default();
  for record in collection {
    summary.total += 1;
    let Some(next) = record.next_review else {
      summary.due_today += 1;
      continue;
    };
    if next < reference {
      summary.overdue += 1;
      summary.due_today += 1;
    } else if next == reference {
      summary.due_today += 1;
    } else if next == tomorrow {
      summary.due_tomorrow += 1;
    } else if next <= week {
      summary.next_7_days += 1;
    } else if next <= month {
      summary.next_30_days += 1;
    }
  }
  summary
}
