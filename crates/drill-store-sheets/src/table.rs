//! Conversion between a collection and worksheet rows.
//!
//! The first row is a header; columns are located by name, so a sheet whose
//! columns were reordered by hand still loads. Blank cells take the record
//! defaults, and a blank `next_review` is scheduled three days after the
//! reference date, matching how rows typed straight into the sheet have
//! always been treated.

use std::collections::HashMap;

use chrono::NaiveDate;
use drill_core::{
  date,
  record::{
    Collection, DEFAULT_DIFFICULTY, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL_DAYS,
    ScheduleRecord,
  },
};
use serde_json::{Number, Value};

use crate::{Error, Result};

/// Header row written on every save.
pub const HEADERS: [&str; 8] = [
  "id",
  "difficulty",
  "ef",
  "reps",
  "interval",
  "last_review",
  "next_review",
  "notes",
];

/// Letter of the last column [`encode`] fills.
pub const LAST_COLUMN: char = (b'A' + HEADERS.len() as u8 - 1) as char;

// ─── Encode ──────────────────────────────────────────────────────────────────

fn date_cell(d: Option<NaiveDate>) -> Value {
  Value::String(d.map(date::encode).unwrap_or_default())
}

fn float_cell(f: f64) -> Value {
  Number::from_f64(f).map_or(Value::Null, Value::Number)
}

/// Header row followed by one row per record.
pub fn encode(collection: &Collection) -> Vec<Vec<Value>> {
  let header = HEADERS.iter().map(|h| Value::from(*h)).collect();
  std::iter::once(header)
    .chain(collection.iter().map(|r| {
      vec![
        Value::from(r.id.as_str()),
        Value::from(r.difficulty),
        float_cell(r.ease_factor),
        Value::from(r.repetitions),
        Value::from(r.interval_days),
        date_cell(r.last_review),
        date_cell(r.next_review),
        Value::from(r.notes.as_str()),
      ]
    }))
    .collect()
}

// ─── Decode ──────────────────────────────────────────────────────────────────

/// Render a cell as the text a user would see.
fn cell_text(cell: &Value) -> String {
  match cell {
    Value::String(s) => s.clone(),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_owned(),
    Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
  }
}

struct RowReader<'a> {
  columns: &'a HashMap<String, usize>,
  cells:   &'a [Value],
  /// 1-based sheet row, for error messages.
  row:     usize,
}

impl RowReader<'_> {
  fn text(&self, column: &str) -> String {
    self
      .columns
      .get(column)
      .and_then(|&i| self.cells.get(i))
      .map(cell_text)
      .unwrap_or_default()
  }

  fn invalid(&self, column: &'static str, value: &str) -> Error {
    Error::InvalidCell { row: self.row, column, value: value.to_owned() }
  }

  /// Whole numbers may arrive as `"4"` or, from number-formatted cells,
  /// `"4.0"`.
  fn int<T: TryFrom<i64>>(&self, column: &'static str, default: T) -> Result<T> {
    let text = self.text(column);
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Ok(default);
    }
    let whole = trimmed.parse::<i64>().ok().or_else(|| {
      trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
        .map(|f| f as i64)
    });
    whole
      .and_then(|v| T::try_from(v).ok())
      .ok_or_else(|| self.invalid(column, trimmed))
  }

  fn float(&self, column: &'static str, default: f64) -> Result<f64> {
    let text = self.text(column);
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Ok(default);
    }
    trimmed
      .parse::<f64>()
      .ok()
      .filter(|f| f.is_finite())
      .ok_or_else(|| self.invalid(column, trimmed))
  }

  fn date(&self, column: &'static str) -> Result<Option<NaiveDate>> {
    let text = self.text(column);
    date::parse_optional(&text).map_err(|_| self.invalid(column, text.trim()))
  }
}

/// Parse worksheet rows into a collection. Rows with a blank id are skipped.
pub fn decode(rows: &[Vec<Value>], reference: NaiveDate) -> Result<Collection> {
  let Some((header, body)) = rows.split_first() else {
    return Ok(Collection::new());
  };

  let columns: HashMap<String, usize> = header
    .iter()
    .enumerate()
    .map(|(i, cell)| (cell_text(cell).trim().to_owned(), i))
    .collect();
  if !columns.contains_key("id") {
    return Err(Error::MissingHeader("id"));
  }

  let mut collection = Collection::new();
  for (offset, cells) in body.iter().enumerate() {
    let reader = RowReader { columns: &columns, cells, row: offset + 2 };

    let id = reader.text("id").trim().to_owned();
    if id.is_empty() {
      continue;
    }

    collection.upsert(ScheduleRecord {
      difficulty:    reader.int("difficulty", DEFAULT_DIFFICULTY)?,
      ease_factor:   reader.float("ef", DEFAULT_EASE_FACTOR)?,
      repetitions:   reader.int("reps", 0)?,
      interval_days: reader.int("interval", DEFAULT_INTERVAL_DAYS)?,
      last_review:   reader.date("last_review")?,
      next_review:   Some(
        reader
          .date("next_review")?
          .unwrap_or_else(|| date::add_days(reference, DEFAULT_INTERVAL_DAYS)),
      ),
      notes:         reader.text("notes"),
      ..ScheduleRecord::new(id)
    });
  }
  Ok(collection)
}
